use std::path::Path;

use log::{info, warn};

use crate::app::handlers::{ExportHandler, SessionHandler};
use crate::app::GestureApp;
use crate::telemetry::{ExportError, ManualClock};
use crate::types::{parse_frame, ExportSummary, IngestError, LandmarkFrame};

/// 读取JSON-lines回放文件，每行一帧
pub fn load_frames<P: AsRef<Path>>(path: P) -> Result<Vec<LandmarkFrame>, IngestError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_frames(&content))
}

/// Blank lines and `#` comments are skipped. A line that fails to parse is
/// logged with its line number and dropped; the rest of the file still plays.
pub fn parse_frames(content: &str) -> Vec<LandmarkFrame> {
    let mut frames = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_frame(line.as_bytes()) {
            Ok(frame) => frames.push(frame),
            Err(e) => warn!("Skipping replay line {}: {}", i + 1, e),
        }
    }
    frames
}

pub fn frames_are_timestamped(frames: &[LandmarkFrame]) -> bool {
    !frames.is_empty() && frames.iter().all(|f| f.timestamp_ms.is_some())
}

/// Plays `frames` through one complete session and exports it.
///
/// The clock is moved to each frame's `timestamp_ms` before the frame is
/// handled, so the export is reproducible. Frames without a timestamp follow
/// the previous frame by `replay.frame_interval_ms`. A frame stamped earlier
/// than its predecessor is skipped.
pub fn run_replay(
    app: &mut GestureApp,
    frames: &[LandmarkFrame],
    clock: &ManualClock,
    session_id: Option<String>,
) -> Result<ExportSummary, ExportError> {
    let interval_ms = app.config.get_config().replay.frame_interval_ms;
    let start_ms = frames.first().and_then(|f| f.timestamp_ms).unwrap_or(0.0);
    clock.set(start_ms);

    SessionHandler::start_session(app, session_id, None, None);

    let mut last_ms: Option<f64> = None;
    let mut skipped = 0usize;
    for (i, frame) in frames.iter().enumerate() {
        let at_ms = match (frame.timestamp_ms, last_ms) {
            (Some(ts), _) => ts,
            (None, Some(prev)) => prev + interval_ms,
            (None, None) => start_ms,
        };
        if let Some(prev) = last_ms {
            if at_ms < prev {
                warn!("Skipping replay frame {}: timestamp {} ms precedes {} ms", i + 1, at_ms, prev);
                skipped += 1;
                continue;
            }
        }

        clock.set(at_ms);
        last_ms = Some(at_ms);
        app.handle_frame(frame);
    }

    SessionHandler::stop_session(app);
    info!(
        "Replay finished: {} frames, {} skipped, {} hands classified",
        app.state.stats.frames_processed, skipped, app.state.stats.hands_classified
    );

    ExportHandler::export_telemetry(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handlers::tests::test_app_exporting_to;
    use crate::recognition::classifier::tests::synthetic_hand;
    use crate::recognition::classifier::{Finger, Handedness};
    use crate::types::Hand;

    fn hand_json(hand: &Hand) -> String {
        let points: Vec<String> = hand
            .points()
            .iter()
            .map(|p| format!(r#"{{"x":{},"y":{},"z":{}}}"#, p.x, p.y, p.z))
            .collect();
        format!("[{}]", points.join(","))
    }

    fn frame_line(hands: &[Hand], timestamp_ms: f64) -> String {
        let hands: Vec<String> = hands.iter().map(hand_json).collect();
        format!(r#"{{"hands":[{}],"timestamp_ms":{}}}"#, hands.join(","), timestamp_ms)
    }

    #[test]
    fn parse_skips_comments_blanks_and_bad_lines() {
        let content = format!(
            "# recorded 2024-06-01\n\n{}\nnot json\n{}\n",
            frame_line(&[], 0.0),
            frame_line(&[], 33.0)
        );
        let frames = parse_frames(&content);
        assert_eq!(frames.len(), 2);
        assert!(frames_are_timestamped(&frames));
    }

    #[test]
    fn untimestamped_frames_are_detected() {
        let frames = parse_frames("{}\n{\"timestamp_ms\":5}\n");
        assert!(!frames_are_timestamped(&frames));
        assert!(!frames_are_timestamped(&[]));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_frames(dir.path().join("absent.jsonl")),
            Err(IngestError::Io(_))
        ));
    }

    #[test]
    fn replay_exports_deterministic_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("frames.jsonl");
        let content = [
            frame_line(&[synthetic_hand(Handedness::Right, &[Finger::Index])], 0.0),
            frame_line(&[], 1000.0),
            frame_line(&[synthetic_hand(Handedness::Left, &Finger::ALL)], 2001.0),
        ]
        .join("\n");
        std::fs::write(&input, content).unwrap();

        let export_dir = dir.path().join("out");
        let (mut app, clock) = test_app_exporting_to(&export_dir);
        let frames = load_frames(&input).unwrap();
        let summary = run_replay(&mut app, &frames, &clock, Some("replay-test".into())).unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.collisions, 0);
        assert_eq!(
            summary.path,
            export_dir.join("hand_recognition_performance_replay-test.csv")
        );

        let csv = std::fs::read_to_string(&summary.path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                crate::telemetry::export::CSV_HEADER,
                "2024-06-01T10:00:00.000Z,0.000,,0.0,1,\"1\",replay-test,wifi,640x480",
                "2024-06-01T10:00:01.000Z,1.000,2,1000.0,0,\"-\",replay-test,wifi,640x480",
                "2024-06-01T10:00:02.001Z,2.001,1,1001.0,1,\"5\",replay-test,wifi,640x480",
            ]
        );
        assert!(!app.state.is_collecting());
    }

    #[test]
    fn untimestamped_frames_are_spaced_by_the_configured_interval() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, clock) = test_app_exporting_to(dir.path());
        let frames = parse_frames(&"{}\n".repeat(300));
        assert!(!frames_are_timestamped(&frames));

        let summary = run_replay(&mut app, &frames, &clock, Some("paced".into())).unwrap();
        assert_eq!(summary.rows, 300);
        assert_eq!(summary.collisions, 0);

        let csv = std::fs::read_to_string(&summary.path).unwrap();
        let second: Vec<&str> = csv.lines().nth(2).unwrap().split(',').collect();
        assert_eq!(second[1], "0.033");
        assert_eq!(second[3], "33.3");
        // 299 * 33.3 ms spans nine full FPS windows
        let fps_rows = csv.lines().skip(1).filter(|l| !l.split(',').nth(2).unwrap().is_empty()).count();
        assert_eq!(fps_rows, 9);
    }

    #[test]
    fn backwards_timestamps_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, clock) = test_app_exporting_to(dir.path());
        let content = [0.0, 1000.0, 500.0, 2001.0]
            .iter()
            .map(|ts| frame_line(&[], *ts))
            .collect::<Vec<_>>()
            .join("\n");
        let frames = parse_frames(&content);

        let summary = run_replay(&mut app, &frames, &clock, Some("rewind".into())).unwrap();
        assert_eq!(app.state.stats.frames_processed, 3);
        assert_eq!(summary.rows, 3);

        let csv = std::fs::read_to_string(&summary.path).unwrap();
        let latencies: Vec<f64> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(3).unwrap().parse().unwrap())
            .collect();
        assert_eq!(latencies, vec![0.0, 1000.0, 1001.0]);
    }

    #[test]
    fn oversized_timestamp_line_is_dropped_not_replayed() {
        let frames = parse_frames("{\"timestamp_ms\":0}\n{\"timestamp_ms\":1e16}\n");
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn replay_without_closed_window_reports_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, clock) = test_app_exporting_to(dir.path());
        let frames = parse_frames(&frame_line(&[], 10.0));
        assert!(matches!(
            run_replay(&mut app, &frames, &clock, None),
            Err(ExportError::NoData)
        ));
    }
}
