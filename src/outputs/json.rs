//! JSON export of a digest.

use crate::models::Digest;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `digest` to `{json_output_dir}/{from}_{to}.json`.
///
/// Creates the output directory if needed and returns the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(
    digest: &Digest,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(json_output_dir).join(format!("{}.json", digest.file_stem()));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = digest.articles.len(), "Wrote JSON digest");
    Ok(path)
}
