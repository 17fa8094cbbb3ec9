//! Errors generated by the analysis pipeline.
use thiserror::Error;

/// Convenience wrapper for all errors in this workspace.
pub type PdgResult<T> = std::result::Result<T, Error>;

/// Errors surfaced while orchestrating analyses. The graph container itself
/// is total: lookups return `Option` and insertions cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Using a pipeline in an invalid way: duplicate registration, unknown
    /// analysis names, or an analysis run before its requirements.
    #[error("{0}")]
    Misc(String),

    /// Failure while writing a graph rendering to an output stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn misc<S: ToString>(msg: S) -> Self {
        Error::Misc(msg.to_string())
    }
}
