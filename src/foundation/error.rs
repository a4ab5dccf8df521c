use std::path::{Path, PathBuf};

/// Result alias used throughout the crate.
pub type CountdownResult<T> = Result<T, CountdownError>;

/// Errors produced while validating, rendering or encoding a countdown.
#[derive(thiserror::Error, Debug)]
pub enum CountdownError {
    /// Caller supplied a missing or malformed parameter. Rendering never started.
    #[error("validation error: {0}")]
    Validation(String),

    /// The scratch directory or output file could not be created or written.
    #[error("filesystem error at '{}': {source}", path.display())]
    Filesystem {
        /// Path the failing operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No usable font face could be loaded or shaped.
    #[error("font error: {0}")]
    Font(String),

    /// The frame encoder rejected a frame or failed to finalize.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CountdownError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Returns `true` for errors caused by caller input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
