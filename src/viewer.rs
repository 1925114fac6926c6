use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, SiftError};

/// Launch `program <path>` without waiting for it to exit.
///
/// Best effort: the caller reports a failure as a warning and the written
/// file stays on disk.
pub fn open_in_external_viewer(program: &str, path: &Path) -> Result<()> {
    if program.trim().is_empty() {
        return Err(SiftError::Viewer {
            program: program.to_string(),
            message: "no viewer program configured".to_string(),
        });
    }

    Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|child| {
            tracing::debug!(program, pid = child.id(), path = %path.display(), "opened viewer");
        })
        .map_err(|e| SiftError::Viewer {
            program: program.to_string(),
            message: e.to_string(),
        })
}
