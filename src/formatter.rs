use crate::colors::ColorScheme;
use crate::history::SelectionProfile;
use crate::record::Record;

/// Projects a record onto the selected fields as `prefix k=v k=v`
pub struct LineFormatter {
    colors: ColorScheme,
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl LineFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            colors: ColorScheme::new(use_colors),
        }
    }

    /// The prefix and separating space are always emitted, even when no
    /// field of the record is selected.
    pub fn format_record(&self, record: &Record, selection: &SelectionProfile) -> String {
        let pairs: Vec<String> = record
            .fields
            .iter()
            .filter(|(key, _)| selection.is_selected(key))
            .map(|(key, value)| self.format_key_value_pair(key, value))
            .collect();

        format!(
            "{} {}",
            self.colors.paint(self.colors.prefix, &record.prefix),
            pairs.join(" ")
        )
    }

    /// Values are written verbatim; quotes stripped at parse time are not restored
    pub fn format_key_value_pair(&self, key: &str, value: &str) -> String {
        if self.colors.is_plain() {
            return format!("{}={}", key, value);
        }
        format!(
            "{}{}{}",
            self.colors.paint(self.colors.key, key),
            self.colors.paint(self.colors.equals, "="),
            self.colors.paint(self.colors.value, value)
        )
    }
}
