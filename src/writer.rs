use chrono::{Local, NaiveTime};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::SiftConfig;
use crate::error::{Result, SiftError};

/// Writes projected lines next to the source file under a time-stamped name
#[derive(Debug, Clone)]
pub struct ResultWriter {
    suffix: String,
    extension: String,
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::from_config(&SiftConfig::default())
    }
}

impl ResultWriter {
    pub fn from_config(config: &SiftConfig) -> Self {
        ResultWriter {
            suffix: config.output_suffix.clone(),
            extension: config.output_extension.clone(),
        }
    }

    /// `{dir}/{stem}_results_{HHMMSS}.txt`
    pub fn output_path_for(&self, source: &Path, time: NaiveTime) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!(
            "{}{}{}.{}",
            stem,
            self.suffix,
            time.format("%H%M%S"),
            self.extension
        );
        match source.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    pub fn write(&self, lines: &[String], source: &Path) -> Result<PathBuf> {
        self.write_at(lines, source, Local::now().time())
    }

    pub fn write_at(&self, lines: &[String], source: &Path, time: NaiveTime) -> Result<PathBuf> {
        let path = self.output_path_for(source, time);
        let to_output_error = |e| SiftError::Output {
            path: path.clone(),
            source: e,
        };

        let file = File::create(&path).map_err(to_output_error)?;
        let mut out = BufWriter::new(file);
        for line in lines {
            writeln!(out, "{}", line).map_err(to_output_error)?;
        }
        out.flush().map_err(to_output_error)?;

        tracing::debug!(path = %path.display(), lines = lines.len(), "wrote results");
        Ok(path)
    }
}
