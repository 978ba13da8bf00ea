use super::state::AppState;
use crate::utils::format_iso_timestamp;

/// One-line rendering of the live metrics, the way the status bar shows them.
pub fn render_status_line(state: &AppState) -> String {
    let live = &state.live;
    format!(
        "[{}] FPS: {} | Latency: {} ms | Hands: {} | Gesture: {}",
        live.status.as_str(),
        live.fps,
        live.latency_display(),
        live.hands,
        live.gesture,
    )
}

pub fn render_session_line(state: &AppState) -> String {
    match &state.session {
        Some(session) => {
            let summary = session.recorder.summary();
            let mut line = format!(
                "{} session {} (started {}) | samples fps={} latency={} hands={} gestures={} | frames processed={} discarded={}",
                state.get_status_summary(),
                session.config.session_id(),
                format_iso_timestamp(&session.config.start_time_absolute),
                summary.fps,
                summary.latency,
                summary.hands_detected,
                summary.gestures,
                state.stats.frames_processed,
                state.stats.frames_discarded,
            );
            if state.export.exports_written > 0 || !state.export.export_status.is_empty() {
                line.push_str(&format!(
                    " | exports={} last: {}",
                    state.export.exports_written, state.export.export_status
                ));
            }
            line
        }
        None => format!(
            "No session | frames discarded={}",
            state.stats.frames_discarded
        ),
    }
}
