use std::path::PathBuf;

/// Key that starts the key=value payload of a structured entry
pub const DEFAULT_MARKER: &str = "date=";

/// File the selection history lives in, relative to the working directory
pub const DEFAULT_HISTORY_FILE: &str = "selection_history.json";

/// Number of selection profiles kept in the history
pub const DEFAULT_HISTORY_LIMIT: usize = 3;

/// Configuration shared by the parser, writer and history store
#[derive(Debug, Clone)]
pub struct SiftConfig {
    pub marker: String,
    pub history_path: PathBuf,
    pub history_limit: usize,
    pub output_suffix: String,
    pub output_extension: String,
    pub viewer: Option<String>,
}

impl Default for SiftConfig {
    fn default() -> Self {
        SiftConfig {
            marker: DEFAULT_MARKER.to_string(),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            history_limit: DEFAULT_HISTORY_LIMIT,
            output_suffix: "_results_".to_string(),
            output_extension: "txt".to_string(),
            viewer: None,
        }
    }
}
