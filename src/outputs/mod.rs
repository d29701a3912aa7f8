//! Export of a finished digest to disk.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`Digest`](crate::models::Digest) as a JSON file
//! - [`markdown`]: Renders the digest as a Markdown document
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-05_2025-05-06.json
//!
//! markdown_output_dir/
//! └── 2025-05-05_2025-05-06.md
//! ```
//!
//! A later run over the same range overwrites the earlier files.

pub mod json;
pub mod markdown;
