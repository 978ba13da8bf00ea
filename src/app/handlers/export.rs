use log::warn;

use crate::app::app_core::GestureApp;
use crate::telemetry::{write_export, ExportError};
use crate::types::ExportSummary;

pub struct ExportHandler;

impl ExportHandler {
    /// Writes the current session's telemetry as CSV. An empty session is
    /// reported and leaves no file behind.
    pub fn export_telemetry(app: &mut GestureApp) -> Result<ExportSummary, ExportError> {
        let now = app.now();
        let export_dir = app.config.get_config().get_export_directory();

        let result = match app.state.session.as_mut() {
            Some(session) => {
                // 确保Session ID已设置
                session.config.ensure_session_id(&now.wall);
                write_export(&export_dir, &session.config, &session.recorder)
            }
            None => Err(ExportError::NoData),
        };

        match &result {
            Ok(summary) => {
                app.state.export.export_status = summary.message();
                app.state.export.exports_written += 1;
            }
            Err(e) => {
                warn!("Export aborted: {}", e);
                app.state.export.export_status = e.to_string();
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handlers::tests::test_app_exporting_to;
    use crate::types::{LandmarkFrame, SessionCommand};

    #[test]
    fn export_without_session_reports_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _clock) = test_app_exporting_to(dir.path());
        assert!(matches!(
            ExportHandler::export_telemetry(&mut app),
            Err(ExportError::NoData)
        ));
        assert_eq!(app.state.export.export_status, "No performance data to export");
    }

    #[test]
    fn export_after_reset_reports_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, clock) = test_app_exporting_to(dir.path());
        app.handle_command(SessionCommand::start_default());
        clock.set(1000.0);
        app.handle_frame(&LandmarkFrame::default());
        app.handle_command(SessionCommand::Reset);

        assert!(matches!(
            ExportHandler::export_telemetry(&mut app),
            Err(ExportError::NoData)
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_fills_missing_session_id() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, clock) = test_app_exporting_to(dir.path());
        app.handle_command(SessionCommand::start_default());
        clock.set(1000.0);
        app.handle_frame(&LandmarkFrame::default());
        app.state.session.as_mut().unwrap().config.session_id = None;

        let summary = ExportHandler::export_telemetry(&mut app).unwrap();
        let name = summary.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("hand_recognition_performance_session_"));
        assert_eq!(app.state.export.exports_written, 1);
    }

    #[test]
    fn export_command_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, clock) = test_app_exporting_to(dir.path());
        app.handle_command(SessionCommand::Start {
            session_id: Some("cmd".into()),
            network_type: None,
            resolution: None,
        });
        clock.set(1000.0);
        app.handle_frame(&LandmarkFrame::default());
        app.handle_command(SessionCommand::Export);

        assert!(dir.path().join("hand_recognition_performance_cmd.csv").exists());
    }
}
