use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::error::{Result, SiftError};

/// Which fields to keep in output. Absent fields count as not selected.
///
/// Equality is structural: same keys with the same flags, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionProfile(IndexMap<String, bool>);

impl SelectionProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile with exactly the given fields switched on
    pub fn from_selected<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().map(|f| (f.into(), true)).collect()
    }

    pub fn set(&mut self, field: &str, selected: bool) {
        self.0.insert(field.to_string(), selected);
    }

    pub fn is_selected(&self, field: &str) -> bool {
        self.0.get(field).copied().unwrap_or(false)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn selected_fields(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, on)| *on).map(|(k, _)| k)
    }
}

impl FromIterator<(String, bool)> for SelectionProfile {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        SelectionProfile(iter.into_iter().collect())
    }
}

/// Result of asking the store to remember a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Identical to the last saved profile, nothing written
    Unchanged,
}

/// The last few selection profiles, persisted as a JSON array.
///
/// Entries are kept oldest first; the newest profile is always last.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_limit(path, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(path: impl Into<PathBuf>, limit: usize) -> Self {
        HistoryStore {
            path: path.into(),
            limit: limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing file is an empty history and a corrupt one is
    /// logged and treated as empty.
    pub fn load(&self) -> Vec<SelectionProfile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read selection history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<SelectionProfile>>(&content) {
            Ok(mut profiles) => {
                if profiles.len() > self.limit {
                    profiles.drain(..profiles.len() - self.limit);
                }
                profiles
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt selection history");
                Vec::new()
            }
        }
    }

    pub fn latest(&self) -> Option<SelectionProfile> {
        self.load().pop()
    }

    /// Newest first, the order a picker offers them as "Last 1", "Last 2", ...
    pub fn recent(&self) -> Vec<SelectionProfile> {
        let mut profiles = self.load();
        profiles.reverse();
        profiles
    }

    /// The `n`-th most recent profile, 1-based
    pub fn select(&self, n: usize) -> Option<SelectionProfile> {
        if n == 0 {
            return None;
        }
        self.recent().into_iter().nth(n - 1)
    }

    /// Append `current` unless it equals `previous`, keeping only the newest
    /// `limit` entries. The caller keeps `current` as its new `previous`.
    pub fn save(
        &self,
        current: &SelectionProfile,
        previous: Option<&SelectionProfile>,
    ) -> Result<SaveOutcome> {
        if previous == Some(current) {
            tracing::info!("No changes detected. Skipping save.");
            return Ok(SaveOutcome::Unchanged);
        }

        let mut profiles = self.load();
        profiles.push(current.clone());
        if profiles.len() > self.limit {
            profiles.drain(..profiles.len() - self.limit);
        }
        self.persist(&profiles)?;
        tracing::debug!(entries = profiles.len(), path = %self.path.display(), "saved selection history");
        Ok(SaveOutcome::Saved)
    }

    fn persist(&self, profiles: &[SelectionProfile]) -> Result<()> {
        let to_history_error = |source| SiftError::History {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(to_history_error)?;
            }
        }
        let content = serde_json::to_string_pretty(profiles)
            .map_err(|e| to_history_error(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, content).map_err(to_history_error)
    }
}
