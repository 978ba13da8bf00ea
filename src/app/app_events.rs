use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::select;
use log::{error, info};

use super::app_core::GestureApp;
use super::handlers::{ExportHandler, SessionHandler};
use super::state::DataChannels;
use super::status::render_session_line;

impl GestureApp {
    /// Drains commands and frames until shutdown is signalled or the ingest
    /// side hangs up. Every frame is fully processed before the next is read.
    pub fn run(&mut self, channels: &DataChannels, shutdown: &AtomicBool) {
        let tick = Duration::from_millis(100);
        let mut connected = true;

        while connected && !shutdown.load(Ordering::Relaxed) {
            select! {
                recv(channels.control_receiver) -> msg => match msg {
                    Ok(command) => self.handle_command(command),
                    Err(_) => connected = false,
                },
                recv(channels.frame_receiver) -> msg => match msg {
                    Ok(frame) => {
                        self.handle_frame(&frame);
                    }
                    Err(_) => connected = false,
                },
                default(tick) => {}
            }
        }

        if !connected {
            info!("Ingest channel disconnected, leaving event loop");
        }
        self.finish();
    }

    /// Stops the active session and, if configured, exports what it recorded.
    pub fn finish(&mut self) {
        if self.state.is_collecting() {
            SessionHandler::stop_session(self);
        }

        let export_on_shutdown = self.config.get_config().export.on_shutdown;
        if export_on_shutdown && self.state.has_data_to_export() {
            if let Err(e) = ExportHandler::export_telemetry(self) {
                error!("Export on shutdown failed: {}", e);
            }
        }

        info!("{}", render_session_line(&self.state));
    }
}
