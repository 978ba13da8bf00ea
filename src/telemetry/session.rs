use chrono::{DateTime, Utc};

use super::clock::ClockReading;
use crate::utils::generate_session_id;

/// Per-session metadata copied into every exported row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub session_id: Option<String>,
    pub network_type: String,
    pub resolution: String,
    pub start_time_absolute: DateTime<Utc>,
    /// Monotonic reading taken once at session start; every elapsed time is
    /// measured from here.
    pub start_time_relative: f64,
}

impl ExperimentConfig {
    /// A blank or missing session id is replaced by one generated from the
    /// start time.
    pub fn start(
        session_id: Option<String>,
        network_type: impl Into<String>,
        resolution: impl Into<String>,
        now: &ClockReading,
    ) -> Self {
        let session_id = session_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| generate_session_id(&now.wall));

        Self {
            session_id: Some(session_id),
            network_type: network_type.into(),
            resolution: resolution.into(),
            start_time_absolute: now.wall,
            start_time_relative: now.monotonic_ms,
        }
    }

    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or_default()
    }

    /// Fills in a missing session id from `now`, returning the id in use.
    pub fn ensure_session_id(&mut self, now: &DateTime<Utc>) -> &str {
        self.session_id
            .get_or_insert_with(|| generate_session_id(now))
            .as_str()
    }
}
