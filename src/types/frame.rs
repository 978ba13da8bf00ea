use serde::Deserialize;

use super::landmark::{Hand, Landmark, LandmarkError};

/// Replay offsets beyond this (one year) are rejected at ingest.
pub const MAX_TIMESTAMP_MS: f64 = 365.0 * 24.0 * 3600.0 * 1000.0;

/// Wire format of one frame, as published by the landmark source. A declared
/// `handedness` field is accepted and ignored; it is recomputed per hand.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct RawFrame {
    #[serde(default, alias = "multiHandLandmarks")]
    pub hands: Vec<Vec<Landmark>>,
    /// Capture time in ms relative to the start of the recording (replay only).
    #[serde(default)]
    pub timestamp_ms: Option<f64>,
}

/// A validated frame: every hand has exactly 21 landmarks.
#[derive(Clone, Debug, Default)]
pub struct LandmarkFrame {
    pub hands: Vec<Hand>,
    pub timestamp_ms: Option<f64>,
}

impl LandmarkFrame {
    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}

impl TryFrom<RawFrame> for LandmarkFrame {
    type Error = IngestError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        if let Some(ts) = raw.timestamp_ms {
            if !(0.0..=MAX_TIMESTAMP_MS).contains(&ts) {
                return Err(IngestError::Timestamp(ts));
            }
        }

        let hands = raw
            .hands
            .into_iter()
            .map(Hand::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            hands,
            timestamp_ms: raw.timestamp_ms,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Landmark(#[from] LandmarkError),
    #[error("timestamp_ms {0} is not an offset between 0 and one year")]
    Timestamp(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn parse_frame(payload: &[u8]) -> Result<LandmarkFrame, IngestError> {
    let payload_str = std::str::from_utf8(payload)?;
    let raw: RawFrame = serde_json::from_str(payload_str)?;
    Ok(LandmarkFrame::try_from(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_json(points: usize) -> String {
        let point = r#"{"x":0.5,"y":0.5,"z":-0.01}"#;
        format!("[{}]", vec![point; points].join(","))
    }

    #[test]
    fn parses_frame_with_two_hands() {
        let payload = format!(
            r#"{{"hands":[{},{}],"handedness":[{{"label":"Left","score":0.9}}],"timestamp_ms":33.0}}"#,
            hand_json(21),
            hand_json(21)
        );
        let frame = parse_frame(payload.as_bytes()).unwrap();
        assert_eq!(frame.hand_count(), 2);
        assert_eq!(frame.timestamp_ms, Some(33.0));
    }

    #[test]
    fn accepts_mediapipe_field_names() {
        let payload = format!(r#"{{"multiHandLandmarks":[{}]}}"#, hand_json(21));
        let frame = parse_frame(payload.as_bytes()).unwrap();
        assert_eq!(frame.hand_count(), 1);
        assert_eq!(frame.timestamp_ms, None);
    }

    #[test]
    fn empty_object_is_a_frame_without_hands() {
        let frame = parse_frame(b"{}").unwrap();
        assert_eq!(frame.hand_count(), 0);
    }

    #[test]
    fn out_of_range_timestamps_are_rejected() {
        for payload in [
            r#"{"timestamp_ms":-1}"#,
            r#"{"timestamp_ms":1e16}"#,
            r#"{"timestamp_ms":1e400}"#,
        ] {
            assert!(
                matches!(parse_frame(payload.as_bytes()), Err(IngestError::Timestamp(_)) | Err(IngestError::Json(_))),
                "{}",
                payload
            );
        }
        assert!(matches!(
            parse_frame(br#"{"timestamp_ms":1e16}"#),
            Err(IngestError::Timestamp(ts)) if ts == 1e16
        ));
        assert_eq!(parse_frame(br#"{"timestamp_ms":0}"#).unwrap().timestamp_ms, Some(0.0));
    }

    #[test]
    fn short_hand_fails_the_whole_frame() {
        let payload = format!(r#"{{"hands":[{},{}]}}"#, hand_json(21), hand_json(19));
        let err = parse_frame(payload.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Landmark(LandmarkError::WrongPointCount { actual: 19, .. })
        ));
    }

    #[test]
    fn rejects_invalid_utf8_and_json() {
        assert!(matches!(parse_frame(&[0xff, 0xfe]), Err(IngestError::Utf8(_))));
        assert!(matches!(parse_frame(b"{hands"), Err(IngestError::Json(_))));
    }
}
