use crossbeam_channel::Receiver;

use crate::telemetry::{ExperimentConfig, GestureSample, TelemetryRecorder};
use crate::types::{LandmarkFrame, SessionCommand};

/// 应用状态管理模块

/// 检测状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionStatus {
    #[default]
    Waiting,
    Detecting,
}

impl DetectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Detecting => "detecting",
        }
    }
}

/// Values mirrored to the status sink after every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMetrics {
    pub fps: u32,
    pub latency_ms: f64,
    pub hands: usize,
    pub gesture: GestureSample,
    pub status: DetectionStatus,
}

impl Default for LiveMetrics {
    fn default() -> Self {
        Self {
            fps: 0,
            latency_ms: 0.0,
            hands: 0,
            gesture: GestureSample::NoHand,
            status: DetectionStatus::Waiting,
        }
    }
}

impl LiveMetrics {
    pub fn latency_display(&self) -> String {
        format!("{:.1}", self.latency_ms)
    }
}

/// 会话状态
#[derive(Debug, Clone)]
pub struct SessionState {
    pub config: ExperimentConfig,
    pub recorder: TelemetryRecorder,
    pub is_active: bool,
}

/// 导出状态
#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub export_status: String,
    pub exports_written: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub frames_processed: u64,
    /// Frames that arrived while no session was active.
    pub frames_discarded: u64,
    pub hands_classified: u64,
}

/// 数据通道状态
#[derive(Debug)]
pub struct DataChannels {
    pub frame_receiver: Receiver<LandmarkFrame>,
    pub control_receiver: Receiver<SessionCommand>,
}

/// 统一的应用状态管理
#[derive(Debug, Default)]
pub struct AppState {
    pub session: Option<SessionState>,
    pub live: LiveMetrics,
    pub export: ExportState,
    pub stats: IngestStats,
}

impl AppState {
    /// 获取当前状态摘要
    pub fn get_status_summary(&self) -> &'static str {
        match &self.session {
            Some(session) if session.is_active => "Collecting",
            Some(_) => "Stopped",
            None => "Idle",
        }
    }

    pub fn is_collecting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_active)
    }

    /// 检查是否有数据需要导出
    pub fn has_data_to_export(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.recorder.has_data())
    }
}
