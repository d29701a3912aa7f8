//! Interactive line-oriented front end.
//!
//! The shell is the user-facing surface of the digest: date inputs, the
//! fetch trigger, and per-article read-aloud / stop controls. Every command
//! that changes what is on screen re-renders the view.
//!
//! ```text
//! from 2025-05-01     set the start date
//! to 2025-05-06       set the end date
//! fetch               fetch and summarize articles
//! speak 3             read article 3's summary aloud
//! stop                stop reading
//! show                render the view again
//! help                list commands
//! quit                leave
//! ```

use crate::controller::DigestController;
use crate::error::Result;
use crate::news::NewsSource;
use crate::render::render;
use crate::speech::{Narrator, SpeechEngine};
use crate::summarize::Summarizer;
use chrono::NaiveDate;
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

pub const HELP: &str = "\
Commands:
  from YYYY-MM-DD   set the start date
  to YYYY-MM-DD     set the end date
  fetch             fetch and summarize articles
  speak N           read article N's summary aloud
  stop              stop reading
  show              render the view again
  help              show this help
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    From(NaiveDate),
    To(NaiveDate),
    Fetch,
    /// 1-based article number, as shown on the cards.
    Speak(usize),
    Stop,
    Show,
    Help,
    Quit,
}

/// Why an input line was not a command. Shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'; type 'help'")]
    Unknown(String),

    #[error("'{0}' needs a date (YYYY-MM-DD)")]
    MissingDate(String),

    #[error("'{0}' is not a date (YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("'speak' needs an article number")]
    MissingNumber,

    #[error("'{0}' is not an article number")]
    InvalidNumber(String),

    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(String),

    #[error("Too many arguments for '{0}'")]
    TooManyArguments(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(CommandError::TooManyArguments(verb.to_string()));
    }

    let date = |arg: Option<&str>| -> std::result::Result<NaiveDate, CommandError> {
        let raw = arg.ok_or_else(|| CommandError::MissingDate(verb.to_string()))?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| CommandError::InvalidDate(raw.to_string()))
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "from" => Command::From(date(arg)?),
        "to" => Command::To(date(arg)?),
        "fetch" | "get" => Command::Fetch,
        "speak" | "read" => {
            let raw = arg.ok_or(CommandError::MissingNumber)?;
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Speak(n),
                _ => return Err(CommandError::InvalidNumber(raw.to_string())),
            }
        }
        "stop" => Command::Stop,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    let takes_arg = matches!(command, Command::From(_) | Command::To(_) | Command::Speak(_));
    if arg.is_some() && !takes_arg {
        return Err(CommandError::UnexpectedArgument(verb.to_string()));
    }
    Ok(Some(command))
}

/// Run the shell until `quit` or end of input.
pub async fn run_shell<N, S, E, R, W>(
    controller: &mut DigestController<N, S>,
    narrator: &Narrator<E>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    N: NewsSource,
    S: Summarizer,
    E: SpeechEngine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Interactive shell started");
    write!(out, "{}", render(&controller.range(), &controller.state()))?;
    writeln!(out, "Type 'help' for commands.")?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                out.flush()?;
                continue;
            }
        };
        debug!(?command, "Shell command");

        match command {
            Command::From(start) => {
                controller.set_start(start);
                write!(out, "{}", render(&controller.range(), &controller.state()))?;
            }
            Command::To(end) => {
                controller.set_end(end);
                write!(out, "{}", render(&controller.range(), &controller.state()))?;
            }
            Command::Fetch => fetch_and_render(controller, out).await?,
            Command::Speak(number) => match controller.summary_at(number - 1) {
                Some(summary) => {
                    if let Err(e) = narrator.read_aloud(&summary) {
                        warn!(error = %e, "Read-aloud failed");
                        writeln!(out, "{e}")?;
                    }
                }
                None => writeln!(out, "No article {number}")?,
            },
            Command::Stop => narrator.stop(),
            Command::Show => write!(out, "{}", render(&controller.range(), &controller.state()))?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => break,
        }
        out.flush()?;
    }

    narrator.stop();
    info!("Interactive shell finished");
    Ok(())
}

/// Trigger a fetch, rendering the loading view as soon as it is published
/// and the final view once the run completes.
async fn fetch_and_render<N, S, W>(controller: &DigestController<N, S>, out: &mut W) -> Result<()>
where
    N: NewsSource,
    S: Summarizer,
    W: Write,
{
    let mut rx = controller.subscribe();
    let fetch = controller.fetch();
    tokio::pin!(fetch);

    let started = loop {
        tokio::select! {
            started = &mut fetch => break started,
            Ok(()) = rx.changed() => {
                let state = rx.borrow_and_update().clone();
                if state.is_loading() {
                    write!(out, "{}", render(&controller.range(), &state))?;
                    out.flush()?;
                }
            }
        }
    };

    if !started {
        writeln!(out, "A fetch is already running.")?;
    }
    write!(out, "{}", render(&controller.range(), &controller.state()))?;
    Ok(())
}
