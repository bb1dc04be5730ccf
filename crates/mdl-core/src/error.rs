//! Per-entry error taxonomy.
//!
//! Every variant is caught at the dispatcher's per-entry boundary and turned
//! into a failed record; none of them ends a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryError {
    /// The input line did not contain a usable http(s) URL.
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Transport failure reported by curl (connect, timeout, TLS, ...).
    #[error("network error: {0}")]
    Network(#[from] curl::Error),

    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    HttpStatus(u32),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ffmpeg failed or could not be started.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// yt-dlp failed or could not be started.
    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl EntryError {
    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EntryError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short category label used in logs and the JSON report.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryError::MalformedInput { .. } => "malformed_input",
            EntryError::Network(_) | EntryError::HttpStatus(_) => "network",
            EntryError::Filesystem { .. } => "filesystem",
            EntryError::Conversion(_) => "conversion",
            EntryError::Extraction(_) => "extraction",
        }
    }
}
