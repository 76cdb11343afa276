use std::path::PathBuf;

/// Errors produced while interpreting console.log.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// console.log doesn't exist, usually because `-condebug` isn't set.
    #[error("console.log not found at {}", path.display())]
    LogUnavailable { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
