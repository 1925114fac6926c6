use indexmap::IndexSet;
use std::ops::RangeInclusive;

use crate::error::{Result, SiftError};
use crate::formatter::LineFormatter;
use crate::history::SelectionProfile;
use crate::record::Record;

/// Caller-facing filter settings, validated by [`ContextFilter::new`]
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub match_text: String,
    /// Keep records that do NOT contain the text
    pub exclude: bool,
    /// Neighbouring records to include on each side of a match
    pub context_radius: i64,
    /// Emit each line once even when context windows overlap
    pub dedup: bool,
}

impl FilterOptions {
    pub fn new(match_text: impl Into<String>) -> Self {
        FilterOptions {
            match_text: match_text.into(),
            ..Default::default()
        }
    }

    pub fn exclude(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn context(mut self, radius: i64) -> Self {
        self.context_radius = radius;
        self
    }

    pub fn dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }
}

/// Selects matching records plus their neighbours by original line index
#[derive(Debug, Clone)]
pub struct ContextFilter {
    needle: String,
    exclude: bool,
    radius: usize,
    dedup: bool,
}

impl ContextFilter {
    pub fn new(options: &FilterOptions) -> Result<Self> {
        if options.context_radius < 0 {
            return Err(SiftError::NegativeContext(options.context_radius));
        }
        Ok(ContextFilter {
            needle: options.match_text.to_lowercase(),
            exclude: options.exclude,
            radius: options.context_radius as usize,
            dedup: options.dedup,
        })
    }

    /// An empty match text matches every record
    pub fn matches(&self, record: &Record) -> bool {
        record.contains_lowercase(&self.needle)
    }

    pub fn is_included(&self, record: &Record) -> bool {
        self.matches(record) != self.exclude
    }

    /// Indices selected directly, before any context expansion
    pub fn included_indices(&self, records: &[Record]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.is_included(record))
            .map(|(index, _)| index)
            .collect()
    }

    /// One clamped window per directly included record, in order.
    /// Windows may overlap.
    pub fn windows<'a>(
        &'a self,
        records: &'a [Record],
    ) -> impl Iterator<Item = RangeInclusive<usize>> + 'a {
        let last = records.len().saturating_sub(1);
        self.included_indices(records)
            .into_iter()
            .map(move |index| index.saturating_sub(self.radius)..=index.saturating_add(self.radius).min(last))
    }

    /// Every visited index in output order. Overlapping windows repeat lines
    /// unless dedup is enabled.
    pub fn visited_indices(&self, records: &[Record]) -> Vec<usize> {
        let visited = self.windows(records).flatten();
        if self.dedup {
            let unique: IndexSet<usize> = visited.collect();
            unique.into_iter().collect()
        } else {
            visited.collect()
        }
    }

    pub fn filter_and_project(
        &self,
        records: &[Record],
        selection: &SelectionProfile,
        formatter: &LineFormatter,
    ) -> Vec<String> {
        let lines: Vec<String> = self
            .visited_indices(records)
            .into_iter()
            .map(|index| formatter.format_record(&records[index], selection))
            .collect();
        tracing::debug!(
            records = records.len(),
            lines = lines.len(),
            radius = self.radius,
            exclude = self.exclude,
            "filtered records"
        );
        lines
    }
}

/// Validate the options, then filter and project in one call
pub fn filter_and_project(
    records: &[Record],
    selection: &SelectionProfile,
    options: &FilterOptions,
) -> Result<Vec<String>> {
    let filter = ContextFilter::new(options)?;
    Ok(filter.filter_and_project(records, selection, &LineFormatter::default()))
}
