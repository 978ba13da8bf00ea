use log::info;

use crate::config::ConfigManager;
use crate::telemetry::{Clock, ClockReading, FrameMetrics};
use crate::types::{LandmarkFrame, SessionCommand};
use super::handlers::{FrameHandler, SessionHandler};
use super::state::AppState;

pub struct GestureApp {
    // 统一的状态管理
    pub state: AppState,

    // 配置管理
    pub config: ConfigManager,

    clock: Box<dyn Clock>,
}

impl GestureApp {
    pub fn new(config: ConfigManager, clock: Box<dyn Clock>) -> Self {
        let app = GestureApp {
            state: AppState::default(),
            config,
            clock,
        };

        info!(
            "App ready, export directory: {}",
            app.config.get_config().get_export_directory().display()
        );

        app
    }

    pub fn now(&self) -> ClockReading {
        self.clock.now()
    }

    pub fn handle_frame(&mut self, frame: &LandmarkFrame) -> Option<FrameMetrics> {
        FrameHandler::handle_frame(self, frame)
    }

    pub fn handle_command(&mut self, command: SessionCommand) {
        SessionHandler::dispatch(self, command);
    }
}
