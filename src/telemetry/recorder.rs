use std::fmt;

use chrono::{DateTime, Utc};

use super::clock::ClockReading;
use super::session::ExperimentConfig;
use crate::recognition::Gesture;

pub const DEFAULT_FPS_WINDOW_MS: f64 = 1000.0;

/// One telemetry value. Never modified once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub value: T,
    pub timestamp: DateTime<Utc>,
    pub elapsed_ms: f64,
}

/// Append-only, chronological by construction.
#[derive(Debug, Clone)]
pub struct SampleStream<T> {
    samples: Vec<Sample<T>>,
}

impl<T> Default for SampleStream<T> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<T> SampleStream<T> {
    pub fn push(&mut self, value: T, at: &ClockReading, elapsed_ms: f64) {
        self.samples.push(Sample {
            value,
            timestamp: at.wall,
            elapsed_ms,
        });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample<T>> {
        self.samples.iter()
    }

    fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Value of the gesture stream: a recognized gesture, or the marker written
/// for frames in which no hand was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSample {
    Recognized(Gesture),
    NoHand,
}

impl GestureSample {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recognized(gesture) => gesture.label(),
            Self::NoHand => "-",
        }
    }
}

impl fmt::Display for GestureSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What `on_frame` measured, for mirroring into live metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    /// Frames counted in the last closed window.
    pub fps: u32,
    pub latency_ms: f64,
    pub window_closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub fps: usize,
    pub latency: usize,
    pub hands_detected: usize,
    pub gestures: usize,
}

/// Owns the four telemetry streams of one session.
///
/// fps and latency grow once per frame; hands_detected and gestures grow once
/// per observed hand (or once per empty frame), so their lengths differ.
#[derive(Debug, Clone)]
pub struct TelemetryRecorder {
    origin_ms: f64,
    window_ms: f64,
    frame_count: u32,
    window_start_ms: f64,
    last_frame_ms: f64,
    current_fps: u32,

    fps: SampleStream<u32>,
    latency: SampleStream<f64>,
    hands_detected: SampleStream<usize>,
    gestures: SampleStream<GestureSample>,
}

impl TelemetryRecorder {
    pub fn with_window(config: &ExperimentConfig, window_ms: f64) -> Self {
        let origin_ms = config.start_time_relative;
        Self {
            origin_ms,
            window_ms,
            frame_count: 0,
            window_start_ms: origin_ms,
            last_frame_ms: origin_ms,
            current_fps: 0,
            fps: SampleStream::default(),
            latency: SampleStream::default(),
            hands_detected: SampleStream::default(),
            gestures: SampleStream::default(),
        }
    }

    fn elapsed_ms(&self, now: &ClockReading) -> f64 {
        now.monotonic_ms - self.origin_ms
    }

    /// Counts the frame, closes the FPS window once it spans `window_ms`, and
    /// records the gap since the previous frame as latency.
    pub fn on_frame(&mut self, now: &ClockReading) -> FrameMetrics {
        let elapsed = self.elapsed_ms(now);
        self.frame_count += 1;

        let window_closed = now.monotonic_ms - self.window_start_ms >= self.window_ms;
        if window_closed {
            self.current_fps = self.frame_count;
            self.fps.push(self.current_fps, now, elapsed);
            self.frame_count = 0;
            self.window_start_ms = now.monotonic_ms;
        }

        // 帧间隔，不是模型推理耗时
        let latency_ms = now.monotonic_ms - self.last_frame_ms;
        self.latency.push(latency_ms, now, elapsed);
        self.last_frame_ms = now.monotonic_ms;

        FrameMetrics {
            fps: self.current_fps,
            latency_ms,
            window_closed,
        }
    }

    pub fn on_hand_observation(&mut self, now: &ClockReading, hand_count: usize, gesture: GestureSample) {
        let elapsed = self.elapsed_ms(now);
        self.hands_detected.push(hand_count, now, elapsed);
        self.gestures.push(gesture, now, elapsed);
    }

    /// Drops all samples and restarts FPS counting from the last seen frame.
    /// The session origin is kept.
    pub fn reset(&mut self) {
        self.fps.clear();
        self.latency.clear();
        self.hands_detected.clear();
        self.gestures.clear();
        self.frame_count = 0;
        self.current_fps = 0;
        self.window_start_ms = self.last_frame_ms;
    }

    pub fn fps(&self) -> &SampleStream<u32> {
        &self.fps
    }

    pub fn latency(&self) -> &SampleStream<f64> {
        &self.latency
    }

    pub fn hands_detected(&self) -> &SampleStream<usize> {
        &self.hands_detected
    }

    pub fn gestures(&self) -> &SampleStream<GestureSample> {
        &self.gestures
    }

    /// Exportable once at least one FPS window has closed.
    pub fn has_data(&self) -> bool {
        !self.fps.is_empty()
    }

    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            fps: self.fps.len(),
            latency: self.latency.len(),
            hands_detected: self.hands_detected.len(),
            gestures: self.gestures.len(),
        }
    }
}

#[cfg(test)]
impl TelemetryRecorder {
    pub(crate) fn new(config: &ExperimentConfig) -> Self {
        Self::with_window(config, DEFAULT_FPS_WINDOW_MS)
    }
}
