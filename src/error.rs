use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SiftError>;

#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    #[error("Failed to read log file '{}': {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Context radius must not be negative (got {0})")]
    NegativeContext(i64),

    #[error("Failed to write results to '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to store selection history in '{}': {source}", .path.display())]
    History {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open viewer '{program}': {message}")]
    Viewer { program: String, message: String },
}

impl SiftError {
    /// Warnings are reported to the user but leave already-written output in place
    pub fn is_warning(&self) -> bool {
        matches!(self, SiftError::Viewer { .. } | SiftError::History { .. })
    }
}
