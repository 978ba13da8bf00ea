use log::{info, warn};

use crate::app::app_core::GestureApp;
use crate::app::state::{LiveMetrics, SessionState};
use crate::telemetry::{ExperimentConfig, TelemetryRecorder};
use crate::types::SessionCommand;
use super::ExportHandler;

pub struct SessionHandler;

impl SessionHandler {
    pub fn dispatch(app: &mut GestureApp, command: SessionCommand) {
        match command {
            SessionCommand::Start {
                session_id,
                network_type,
                resolution,
            } => Self::start_session(app, session_id, network_type, resolution),
            SessionCommand::Stop => Self::stop_session(app),
            SessionCommand::Reset => Self::reset_telemetry(app),
            SessionCommand::Export => {
                // 失败已在导出处理中记录
                let _ = ExportHandler::export_telemetry(app);
            }
        }
    }

    /// Begins a new session with fresh streams, anchored at the current clock
    /// reading. Unset fields fall back to the configured defaults.
    pub fn start_session(
        app: &mut GestureApp,
        session_id: Option<String>,
        network_type: Option<String>,
        resolution: Option<String>,
    ) {
        let now = app.now();
        let defaults = &app.config.get_config().session;
        let config = ExperimentConfig::start(
            session_id,
            network_type.unwrap_or_else(|| defaults.network_type.clone()),
            resolution.unwrap_or_else(|| defaults.resolution.clone()),
            &now,
        );
        let recorder = TelemetryRecorder::with_window(&config, defaults.fps_window_ms);

        if let Some(previous) = &app.state.session {
            if previous.recorder.has_data() {
                warn!(
                    "Starting a new session discards {} fps samples of session {}",
                    previous.recorder.summary().fps,
                    previous.config.session_id()
                );
            }
        }

        info!(
            "Session started: {} (network: {}, resolution: {})",
            config.session_id(),
            config.network_type,
            config.resolution
        );

        app.state.session = Some(SessionState {
            config,
            recorder,
            is_active: true,
        });
        app.state.live = LiveMetrics::default();
    }

    /// Stops accepting frames. Recorded data stays available for export.
    pub fn stop_session(app: &mut GestureApp) {
        match app.state.session.as_mut() {
            Some(session) if session.is_active => {
                session.is_active = false;
                let summary = session.recorder.summary();
                info!(
                    "Session stopped: {} ({} fps samples, {} latency samples)",
                    session.config.session_id(),
                    summary.fps,
                    summary.latency
                );
            }
            _ => warn!("Stop requested but no session is active"),
        }
        app.state.live = LiveMetrics::default();
    }

    pub fn reset_telemetry(app: &mut GestureApp) {
        match app.state.session.as_mut() {
            Some(session) => {
                session.recorder.reset();
                info!("Telemetry reset for session {}", session.config.session_id());
            }
            None => warn!("Reset requested but no session exists"),
        }
    }
}
