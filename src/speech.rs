//! Read-aloud playback through a local text-to-speech program.
//!
//! [`Narrator`] enforces the hand-off rule: starting playback always cancels
//! whatever is currently being spoken first, and stopping cancels without
//! starting anything. There is no queue and no per-article playback state.

use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// espeak's default speaking rate in words per minute, used as the 1.0 point.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Rate, pitch and volume multipliers, 1.0 being the engine's default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Text plus the settings to speak it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceSettings,
}

/// A device speech capability with cancel-all semantics.
pub trait SpeechEngine {
    /// Start speaking `utterance`; returns once playback has begun.
    fn speak(&self, utterance: &Utterance) -> Result<()>;

    /// Cancel all current playback. Never fails.
    fn cancel_all(&self);
}

/// Speaks summaries with fixed voice settings.
#[derive(Debug)]
pub struct Narrator<E> {
    engine: E,
    voice: VoiceSettings,
}

impl<E: SpeechEngine> Narrator<E> {
    pub fn new(engine: E, voice: VoiceSettings) -> Self {
        Self { engine, voice }
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    /// Cancel any playback in progress, then start speaking `text`.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub fn read_aloud(&self, text: &str) -> Result<()> {
        self.engine.cancel_all();
        self.engine.speak(&Utterance {
            text: text.to_string(),
            voice: self.voice,
        })
    }

    pub fn stop(&self) {
        self.engine.cancel_all();
    }
}

/// Which local text-to-speech program to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechBackend {
    #[default]
    Espeak,
    EspeakNg,
    /// macOS `say`.
    Say,
    Disabled,
}

impl SpeechBackend {
    /// Program name and arguments for `voice`; the text goes in on stdin.
    pub fn command_line(&self, voice: &VoiceSettings) -> Option<(&'static str, Vec<String>)> {
        let wpm = (BASE_WORDS_PER_MINUTE * voice.rate).round().max(1.0) as u32;
        match self {
            SpeechBackend::Espeak | SpeechBackend::EspeakNg => {
                let program = if *self == SpeechBackend::Espeak {
                    "espeak"
                } else {
                    "espeak-ng"
                };
                let pitch = (50.0 * voice.pitch).round().clamp(0.0, 99.0) as u32;
                let amplitude = (100.0 * voice.volume).round().clamp(0.0, 200.0) as u32;
                Some((
                    program,
                    vec![
                        "-s".to_string(),
                        wpm.to_string(),
                        "-p".to_string(),
                        pitch.to_string(),
                        "-a".to_string(),
                        amplitude.to_string(),
                        "--stdin".to_string(),
                    ],
                ))
            }
            SpeechBackend::Say => Some((
                "say",
                vec!["-r".to_string(), wpm.to_string(), "-f".to_string(), "-".to_string()],
            )),
            SpeechBackend::Disabled => None,
        }
    }
}

/// Runs a TTS program as a child process; cancelling kills it.
///
/// At most one child is alive at a time: starting a new utterance kills and
/// reaps the previous one, so `cancel_all` always reaches whatever is playing.
#[derive(Debug)]
pub struct CommandSpeechEngine {
    backend: SpeechBackend,
    program: Option<(String, Vec<String>)>,
    current: Mutex<Option<Child>>,
}

impl CommandSpeechEngine {
    pub fn new(backend: SpeechBackend) -> Self {
        Self {
            backend,
            program: None,
            current: Mutex::new(None),
        }
    }

    /// Drive `program` with fixed `args` instead of the backend's command line.
    /// Voice settings are not mapped onto it.
    pub fn with_program(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            backend: SpeechBackend::default(),
            program: Some((program.into(), args)),
            current: Mutex::new(None),
        }
    }

    fn command_line(&self, voice: &VoiceSettings) -> Option<(String, Vec<String>)> {
        match &self.program {
            Some(custom) => Some(custom.clone()),
            None => self
                .backend
                .command_line(voice)
                .map(|(program, args)| (program.to_string(), args)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Child>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_speaking(&self) -> bool {
        let mut current = self.lock();
        match current.as_mut().map(|child| child.try_wait()) {
            Some(Ok(None)) => true,
            _ => {
                *current = None;
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn current_pid(&self) -> Option<u32> {
        self.lock().as_ref().map(Child::id)
    }
}

/// Kill `child` if it is still running, then reap it.
fn stop_child(mut child: Child) {
    if let Err(e) = child.kill() {
        // Already exited on its own
        debug!(error = %e, "Speech process not killed");
    }
    if let Err(e) = child.wait() {
        warn!(error = %e, "Failed to reap speech process");
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn speak(&self, utterance: &Utterance) -> Result<()> {
        let Some((program, args)) = self.command_line(&utterance.voice) else {
            debug!("Speech disabled; dropping utterance");
            return Ok(());
        };

        let mut current = self.lock();
        if let Some(previous) = current.take() {
            stop_child(previous);
            info!("Previous speech replaced");
        }

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DigestError::Speech(format!("failed to start {program}: {e}")))?;

        // Dropping stdin closes it so the program starts speaking
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(utterance.text.as_bytes()) {
                stop_child(child);
                return Err(DigestError::Speech(format!(
                    "failed to send text to {program}: {e}"
                )));
            }
        }

        info!(program = %program, pid = child.id(), "Speech started");
        *current = Some(child);
        Ok(())
    }

    fn cancel_all(&self) {
        if let Some(child) = self.lock().take() {
            stop_child(child);
            info!("Speech cancelled");
        }
    }
}

impl Drop for CommandSpeechEngine {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
