use std::io;

use thiserror::Error;

use crate::catalog::Language;

/// Failures while building a catalog or compiling it into a detector.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("empty pattern in {language} group at position {index}")]
    EmptyPattern { language: Language, index: usize },

    #[error("duplicate catalog entry at position {index}: {pattern:?}")]
    DuplicateEntry { index: usize, pattern: String },

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failures inside the hook adapter. These never escape `hook::evaluate`;
/// they are logged and turned into "no output".
#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("hook payload has no transcript_path")]
    MissingTranscript,

    #[error("failed to read transcript {path}: {source}")]
    Transcript {
        path: String,
        #[source]
        source: io::Error,
    },
}
