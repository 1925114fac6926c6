use std::path::{Path, PathBuf};

use crate::config::SiftConfig;
use crate::error::Result;
use crate::filter::{ContextFilter, FilterOptions};
use crate::formatter::LineFormatter;
use crate::history::{HistoryStore, SaveOutcome, SelectionProfile};
use crate::parser::RecordParser;
use crate::record::{FieldCatalog, Record};
use crate::viewer;
use crate::writer::ResultWriter;

/// Everything a front end needs after loading a file
#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub path: PathBuf,
    pub records: Vec<Record>,
    pub catalog: FieldCatalog,
    /// Catalog fields checked according to the newest history entry
    pub suggested: SelectionProfile,
    /// Reference for change detection on the next save
    pub last_saved: Option<SelectionProfile>,
}

/// Outcome of a save
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub path: PathBuf,
    pub lines_written: usize,
    pub history_changed: bool,
    /// Non-fatal problems after the file was written
    pub warnings: Vec<String>,
}

/// Ties parser, filter, writer and history together for a single caller
#[derive(Debug, Clone)]
pub struct Session {
    config: SiftConfig,
    parser: RecordParser,
    writer: ResultWriter,
    history: HistoryStore,
}

impl Session {
    pub fn new(config: SiftConfig) -> Self {
        Session {
            parser: RecordParser::new(&config.marker),
            writer: ResultWriter::from_config(&config),
            history: HistoryStore::with_limit(&config.history_path, config.history_limit),
            config,
        }
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn load_file(&self, path: &Path) -> Result<LoadedLog> {
        let parsed = self.parser.load_file(path)?;
        let last_saved = self.history.latest();
        let suggested = parsed.catalog.suggest_profile(last_saved.as_ref());
        tracing::info!(
            path = %path.display(),
            records = parsed.records.len(),
            fields = parsed.catalog.len(),
            "loaded log file"
        );
        Ok(LoadedLog {
            path: path.to_path_buf(),
            records: parsed.records,
            catalog: parsed.catalog,
            suggested,
            last_saved,
        })
    }

    pub fn run_filter(
        &self,
        records: &[Record],
        profile: &SelectionProfile,
        options: &FilterOptions,
    ) -> Result<Vec<String>> {
        let filter = ContextFilter::new(options)?;
        Ok(filter.filter_and_project(records, profile, &LineFormatter::default()))
    }

    /// Returns whether the history was written. On success `last_saved`
    /// becomes `profile`.
    pub fn persist_profile(
        &self,
        profile: &SelectionProfile,
        last_saved: &mut Option<SelectionProfile>,
    ) -> Result<bool> {
        match self.history.save(profile, last_saved.as_ref())? {
            SaveOutcome::Saved => {
                *last_saved = Some(profile.clone());
                Ok(true)
            }
            SaveOutcome::Unchanged => Ok(false),
        }
    }

    /// Filter, write the result file, then remember the profile.
    ///
    /// A contract violation aborts before anything is written. Failing to
    /// update the history only adds a warning.
    pub fn save_results(
        &self,
        loaded: &mut LoadedLog,
        profile: &SelectionProfile,
        options: &FilterOptions,
    ) -> Result<SaveReport> {
        let lines = self.run_filter(&loaded.records, profile, options)?;
        let path = self.writer.write(&lines, &loaded.path)?;
        let mut warnings = Vec::new();
        let history_changed = match self.persist_profile(profile, &mut loaded.last_saved) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "results written but history not updated");
                warnings.push(e.to_string());
                false
            }
        };
        Ok(SaveReport {
            path,
            lines_written: lines.len(),
            history_changed,
            warnings,
        })
    }

    /// Open a result in the configured viewer, if any
    pub fn open_in_viewer(&self, path: &Path) -> Result<bool> {
        match self.config.viewer.as_deref() {
            Some(program) => viewer::open_in_external_viewer(program, path).map(|_| true),
            None => Ok(false),
        }
    }
}
