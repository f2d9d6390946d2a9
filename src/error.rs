//! Unified error handling for node stitching.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Errors raised while loading candidates, stitching paths, or writing output.
#[derive(Error, Debug)]
pub enum StitchError {
    /// Invalid or missing run configuration (paths, schema, output format).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed time header in the candidate stream.
    #[error("Malformed time string at line {line}: \"{content}\" ({reason})")]
    Format {
        line: usize,
        content: String,
        reason: String,
    },

    /// Failure to open, read or write a file.
    #[error("Unable to access \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stream-level I/O failure with no associated path.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
}

impl StitchError {
    pub fn config(message: impl Into<String>) -> Self {
        StitchError::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StitchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Extension trait for turning missing values into configuration errors.
pub trait OptionExt<T> {
    fn ok_or_config(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_config(self, message: &str) -> Result<T> {
        self.ok_or_else(|| StitchError::config(message))
    }
}
