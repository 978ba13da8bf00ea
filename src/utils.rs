use chrono::{DateTime, Utc};

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T08:30:15.123Z`
pub fn format_iso_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// 毫秒转为秒，保留3位小数
pub fn format_elapsed_seconds(elapsed_ms: f64) -> String {
    format!("{:.3}", elapsed_ms / 1000.0)
}

/// `session_` followed by the ISO timestamp with `:` and `.` replaced by `-`,
/// so the id is safe to embed in a file name.
pub fn generate_session_id(time: &DateTime<Utc>) -> String {
    format!("session_{}", format_iso_timestamp(time).replace([':', '.'], "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 15).unwrap() + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn iso_timestamp_has_millis_and_zulu() {
        assert_eq!(format_iso_timestamp(&sample_time()), "2024-05-01T08:30:15.123Z");
    }

    #[test]
    fn elapsed_is_seconds_with_three_decimals() {
        assert_eq!(format_elapsed_seconds(0.0), "0.000");
        assert_eq!(format_elapsed_seconds(1234.5), "1.234");
        assert_eq!(format_elapsed_seconds(61000.0), "61.000");
    }

    #[test]
    fn session_id_is_file_name_safe() {
        let id = generate_session_id(&sample_time());
        assert_eq!(id, "session_2024-05-01T08-30-15-123Z");
    }
}
