use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Render a stored naive-UTC timestamp the way the frontend expects:
/// RFC 3339 with milliseconds and a `Z` suffix.
pub fn format_utc(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_with_z_suffix() {
        let dt = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(format_utc(dt), "2026-03-01T09:30:00.000Z");
    }
}
