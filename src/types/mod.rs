pub mod landmark;
pub mod frame;
pub mod results;
pub mod tasks;

pub use landmark::Hand;
pub use frame::{parse_frame, IngestError, LandmarkFrame};
pub use results::ExportSummary;
pub use tasks::{parse_command, SessionCommand};
