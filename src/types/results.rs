use std::path::PathBuf;

/// Result of a telemetry export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    /// Cells overwritten because two samples of one stream fell on the same millisecond.
    pub collisions: usize,
}

impl ExportSummary {
    pub fn new(path: PathBuf, rows: usize, collisions: usize) -> Self {
        Self {
            path,
            rows,
            collisions,
        }
    }

    pub fn message(&self) -> String {
        match self.collisions {
            0 => format!("Exported {} rows to {}", self.rows, self.path.display()),
            n => format!(
                "Exported {} rows to {} ({} same-millisecond overwrites)",
                self.rows,
                self.path.display(),
                n
            ),
        }
    }
}
