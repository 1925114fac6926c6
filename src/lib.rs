// src/lib.rs
pub mod colors;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod history;
pub mod parser;
pub mod record;
pub mod session;
pub mod viewer;
pub mod writer;

pub use error::*;

pub use config::SiftConfig;
pub use filter::{filter_and_project, ContextFilter, FilterOptions};
pub use formatter::LineFormatter;
pub use history::{HistoryStore, SaveOutcome, SelectionProfile};
pub use parser::{ParsedLog, RecordParser};
pub use record::{FieldCatalog, Record};
pub use session::{LoadedLog, SaveReport, Session};
pub use viewer::open_in_external_viewer;
pub use writer::ResultWriter;
