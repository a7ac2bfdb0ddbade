//! HL7 TS literal parsing
//!
//! Source timestamps arrive as HL7 TS literals of varying precision
//! (`2020`, `202001`, `20200101`, `202001011030`, `20200101103000`,
//! optionally with a fraction and a `+HHMM` offset). Values without an
//! offset are taken as UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Parses an HL7 TS literal into a UTC instant.
///
/// Returns `None` for values that are not valid TS literals; callers treat
/// that the same as an absent timestamp.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let (body, offset_seconds) = split_offset(value);
    let body = body.split('.').next().unwrap_or(body);
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let padded = match body.len() {
        4 => format!("{body}0101000000"),
        6 => format!("{body}01000000"),
        8 => format!("{body}000000"),
        10 => format!("{body}0000"),
        12 => format!("{body}00"),
        14 => body.to_string(),
        _ => return None,
    };

    let naive = NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S").ok()?;
    match offset_seconds {
        Some(seconds) => FixedOffset::east_opt(seconds)?
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}

/// Formats an instant for in-band annotations (e.g. the immunization
/// end-date note).
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

fn split_offset(value: &str) -> (&str, Option<i32>) {
    // An offset sign can only follow the date part; earlier +/- would not
    // be a TS literal at all.
    if let Some(pos) = value.rfind(['+', '-']) {
        if pos >= 8 && value.len() - pos == 5 {
            let (body, tz) = value.split_at(pos);
            let sign = if tz.starts_with('-') { -1 } else { 1 };
            let digits = &tz[1..];
            if let (Ok(hours), Ok(minutes)) =
                (digits[..2].parse::<i32>(), digits[2..].parse::<i32>())
            {
                return (body, Some(sign * (hours * 3600 + minutes * 60)));
            }
        }
    }
    (value, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap(),
        )
    }

    #[test]
    fn test_parse_full_precision() {
        assert_eq!(
            parse_instant("20200101103045"),
            Some(utc(2020, 1, 1, 10, 30, 45))
        );
    }

    #[test]
    fn test_parse_partial_precision() {
        assert_eq!(parse_instant("2020"), Some(utc(2020, 1, 1, 0, 0, 0)));
        assert_eq!(parse_instant("202006"), Some(utc(2020, 6, 1, 0, 0, 0)));
        assert_eq!(parse_instant("20200615"), Some(utc(2020, 6, 15, 0, 0, 0)));
        assert_eq!(
            parse_instant("202006151030"),
            Some(utc(2020, 6, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_with_offset() {
        assert_eq!(
            parse_instant("20200615103000+0100"),
            Some(utc(2020, 6, 15, 9, 30, 0))
        );
        assert_eq!(
            parse_instant("20200615103000-0230"),
            Some(utc(2020, 6, 15, 13, 0, 0))
        );
    }

    #[test]
    fn test_parse_with_fraction() {
        assert_eq!(
            parse_instant("20200615103000.123"),
            Some(utc(2020, 6, 15, 10, 30, 0))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_instant(""), None);
        assert_eq!(parse_instant("not-a-date"), None);
        assert_eq!(parse_instant("20201340"), None);
    }

    #[test]
    fn test_format_instant() {
        assert_eq!(
            format_instant(&utc(2020, 6, 15, 10, 30, 0)),
            "2020-06-15T10:30:00+00:00"
        );
    }
}
