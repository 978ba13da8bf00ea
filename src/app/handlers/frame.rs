use log::{debug, info};

use crate::app::app_core::GestureApp;
use crate::app::state::{DetectionStatus, LiveMetrics};
use crate::app::status::render_status_line;
use crate::recognition::{classify, recognize};
use crate::telemetry::{FrameMetrics, GestureSample};
use crate::types::LandmarkFrame;

pub struct FrameHandler;

impl FrameHandler {
    /// Runs one frame through classify -> recognize -> record. Frames that
    /// arrive without an active session are dropped.
    pub fn handle_frame(app: &mut GestureApp, frame: &LandmarkFrame) -> Option<FrameMetrics> {
        let now = app.now();

        let session = match app.state.session.as_mut() {
            Some(session) if session.is_active => session,
            _ => {
                app.state.stats.frames_discarded += 1;
                debug!("Frame discarded, no active session");
                return None;
            }
        };

        let metrics = session.recorder.on_frame(&now);
        let hand_count = frame.hand_count();
        let mut gesture = GestureSample::NoHand;

        if hand_count == 0 {
            session.recorder.on_hand_observation(&now, 0, GestureSample::NoHand);
        } else {
            // 每只手单独记录一次
            for (i, hand) in frame.hands.iter().enumerate() {
                let (handedness, state) = classify(hand);
                let recognized = recognize(&state);
                debug!(
                    "hand {}/{}: {} extended={:?} gesture={}",
                    i + 1,
                    hand_count,
                    handedness.as_str(),
                    state.extended().map(|f| f.as_str()).collect::<Vec<_>>(),
                    recognized
                );
                gesture = GestureSample::Recognized(recognized);
                session.recorder.on_hand_observation(&now, hand_count, gesture);
            }
        }

        app.state.stats.frames_processed += 1;
        app.state.stats.hands_classified += hand_count as u64;
        app.state.live = LiveMetrics {
            fps: metrics.fps,
            latency_ms: metrics.latency_ms,
            hands: hand_count,
            gesture,
            status: if hand_count > 0 {
                DetectionStatus::Detecting
            } else {
                DetectionStatus::Waiting
            },
        };

        if metrics.window_closed {
            info!("{}", render_status_line(&app.state));
        }

        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handlers::tests::test_app;
    use crate::recognition::classifier::tests::synthetic_hand;
    use crate::recognition::classifier::{Finger, Handedness};
    use crate::recognition::Gesture;
    use crate::types::SessionCommand;

    fn frame_with(hands: Vec<crate::types::Hand>) -> LandmarkFrame {
        LandmarkFrame {
            hands,
            timestamp_ms: None,
        }
    }

    #[test]
    fn frames_without_session_are_discarded() {
        let (mut app, _clock) = test_app();
        assert!(app.handle_frame(&LandmarkFrame::default()).is_none());
        assert_eq!(app.state.stats.frames_discarded, 1);
        assert_eq!(app.state.stats.frames_processed, 0);
    }

    #[test]
    fn empty_frame_records_sentinel() {
        let (mut app, clock) = test_app();
        app.handle_command(SessionCommand::start_default());
        clock.set(16.0);
        app.handle_frame(&LandmarkFrame::default());

        let recorder = &app.state.session.as_ref().unwrap().recorder;
        assert_eq!(recorder.hands_detected().iter().next_back().unwrap().value, 0);
        assert_eq!(recorder.gestures().iter().next_back().unwrap().value, GestureSample::NoHand);
        assert_eq!(app.state.live.status, DetectionStatus::Waiting);
        assert_eq!(app.state.live.latency_ms, 16.0);
    }

    #[test]
    fn each_hand_is_recorded_with_frame_hand_count() {
        let (mut app, clock) = test_app();
        app.handle_command(SessionCommand::start_default());
        clock.set(20.0);
        let frame = frame_with(vec![
            synthetic_hand(Handedness::Right, &[Finger::Index]),
            synthetic_hand(Handedness::Left, &Finger::ALL),
        ]);
        app.handle_frame(&frame);

        let recorder = &app.state.session.as_ref().unwrap().recorder;
        let hands: Vec<usize> = recorder.hands_detected().iter().map(|s| s.value).collect();
        assert_eq!(hands, vec![2, 2]);
        let gestures: Vec<&str> = recorder.gestures().iter().map(|s| s.value.label()).collect();
        assert_eq!(gestures, vec!["1", "5"]);
        assert_eq!(recorder.latency().len(), 1);

        assert_eq!(app.state.live.hands, 2);
        assert_eq!(app.state.live.gesture, GestureSample::Recognized(Gesture::Five));
        assert_eq!(app.state.live.status, DetectionStatus::Detecting);
        assert_eq!(app.state.stats.hands_classified, 2);
    }

    #[test]
    fn live_fps_follows_closed_windows() {
        let (mut app, clock) = test_app();
        app.handle_command(SessionCommand::start_default());
        for i in 1..=20 {
            clock.set(i as f64 * 50.0);
            app.handle_frame(&LandmarkFrame::default());
        }
        assert_eq!(app.state.live.fps, 20);
        assert_eq!(app.state.stats.frames_processed, 20);
    }
}
