//! Session telemetry: four parallel sample streams on one clock, and the CSV
//! export that joins them.

pub mod clock;
pub mod session;
pub mod recorder;
pub mod export;

pub use clock::{Clock, ClockReading, ManualClock, SystemClock};
pub use session::ExperimentConfig;
pub use recorder::{FrameMetrics, GestureSample, TelemetryRecorder};
pub use export::{write_export, ExportError};
