use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::recorder::{GestureSample, Sample, SampleStream, TelemetryRecorder};
use super::session::ExperimentConfig;
use crate::types::ExportSummary;
use crate::utils::{format_elapsed_seconds, format_iso_timestamp};

pub const CSV_HEADER: &str = "Absolute Timestamp,Relative Time (s),FPS,Latency (ms),Hands Detected,Gesture,Session ID,Network Type,Resolution";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No performance data to export")]
    NoData,
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One merged row. Seeded by whichever sample first lands on its millisecond.
#[derive(Debug, Clone, Default, PartialEq)]
struct ExportRow {
    timestamp: String,
    relative: String,
    fps: Option<u32>,
    latency: Option<f64>,
    hands_detected: Option<usize>,
    gesture: Option<&'static str>,
}

/// The CSV bytes plus what the merge did.
#[derive(Debug, Clone)]
pub struct RenderedExport {
    pub bytes: Vec<u8>,
    pub rows: usize,
    pub collisions: usize,
}

struct RowIndex {
    rows: BTreeMap<i64, ExportRow>,
    collisions: usize,
}

impl RowIndex {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            collisions: 0,
        }
    }

    /// Folds one stream into the index. `fill` writes the sample's column and
    /// returns whether it replaced an earlier value.
    fn merge<T>(&mut self, stream: &SampleStream<T>, fill: impl Fn(&mut ExportRow, &Sample<T>) -> bool) {
        for sample in stream.iter() {
            let row = self
                .rows
                .entry(sample.timestamp.timestamp_millis())
                .or_insert_with(|| ExportRow {
                    timestamp: format_iso_timestamp(&sample.timestamp),
                    relative: format_elapsed_seconds(sample.elapsed_ms),
                    ..ExportRow::default()
                });
            // 同一毫秒的多个样本：后写覆盖先写
            if fill(row, sample) {
                self.collisions += 1;
            }
        }
    }
}

fn merge_streams(
    fps: &SampleStream<u32>,
    latency: &SampleStream<f64>,
    hands_detected: &SampleStream<usize>,
    gestures: &SampleStream<GestureSample>,
) -> RowIndex {
    let mut index = RowIndex::new();
    index.merge(fps, |row, s| row.fps.replace(s.value).is_some());
    index.merge(latency, |row, s| row.latency.replace(s.value).is_some());
    index.merge(hands_detected, |row, s| row.hands_detected.replace(s.value).is_some());
    index.merge(gestures, |row, s| row.gesture.replace(s.value.label()).is_some());
    index
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Free-text metadata is written bare unless it would break the row.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

fn render_row(row: &ExportRow, config: &ExperimentConfig) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{}\n",
        row.timestamp,
        row.relative,
        row.fps.map(|v| v.to_string()).unwrap_or_default(),
        row.latency.map(|v| format!("{:.1}", v)).unwrap_or_default(),
        row.hands_detected.map(|v| v.to_string()).unwrap_or_default(),
        quote(row.gesture.unwrap_or_default()),
        csv_field(config.session_id()),
        csv_field(&config.network_type),
        csv_field(&config.resolution),
    )
}

/// Joins the four streams on their millisecond wall-clock timestamp and
/// renders one CSV row per distinct millisecond, in time order.
pub fn render_csv(config: &ExperimentConfig, recorder: &TelemetryRecorder) -> Result<RenderedExport, ExportError> {
    if !recorder.has_data() {
        return Err(ExportError::NoData);
    }

    let index = merge_streams(
        recorder.fps(),
        recorder.latency(),
        recorder.hands_detected(),
        recorder.gestures(),
    );

    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + index.rows.len() * 96);
    csv.push_str(CSV_HEADER);
    csv.push('\n');
    for row in index.rows.values() {
        csv.push_str(&render_row(row, config));
    }

    Ok(RenderedExport {
        bytes: csv.into_bytes(),
        rows: index.rows.len(),
        collisions: index.collisions,
    })
}

/// Characters outside `[A-Za-z0-9._-]` become `_`, so the id cannot leave
/// the export directory or produce an unwritable name.
pub fn export_file_name(session_id: &str) -> String {
    let safe: String = session_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    format!("hand_recognition_performance_{}.csv", safe)
}

/// Renders the session and writes it to `dir` in a single write.
pub fn write_export(dir: &Path, config: &ExperimentConfig, recorder: &TelemetryRecorder) -> Result<ExportSummary, ExportError> {
    let rendered = render_csv(config, recorder)?;

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(export_file_name(config.session_id()));
    std::fs::write(&path, &rendered.bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    if rendered.collisions > 0 {
        warn!(
            "{} samples shared a millisecond with an earlier sample of the same stream and were overwritten",
            rendered.collisions
        );
    }
    info!(
        "Exported session {} to {} ({} rows)",
        config.session_id(),
        path.display(),
        rendered.rows
    );

    Ok(ExportSummary::new(path, rendered.rows, rendered.collisions))
}
