use std::iter::repeat;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub fn find_first_subpath<P: AsRef<Path>, F: Fn(&Path) -> bool>(
    root: impl AsRef<Path>,
    subpaths: &[P],
    search: F,
) -> Option<PathBuf> {
    subpaths
        .iter()
        .zip(repeat(root.as_ref()))
        .map(|(b, a)| a.join(b))
        .find(|it: &PathBuf| search(it))
}

/// Parses a `date` query parameter.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date; bare dates
/// are interpreted as local midnight so they land on the intended calendar
/// day when matched against stored records.
pub fn parse_date_param(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let date = value.parse::<NaiveDate>().ok()?;
    let midnight = Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()?;
    Some(midnight.with_timezone(&Utc))
}

/// The local wall-clock calendar day a timestamp falls on.
pub fn local_day(value: DateTime<Utc>) -> NaiveDate {
    value.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parse_date_param_accepts_rfc3339() {
        let parsed = parse_date_param("2024-01-10T14:30:00Z").expect("valid timestamp");
        assert_eq!(parsed.hour(), 14);
        assert_eq!(local_day(parsed), parsed.with_timezone(&Local).date_naive());
    }

    #[test]
    fn parse_date_param_accepts_bare_date() {
        let parsed = parse_date_param("2024-01-10").expect("valid date");
        assert_eq!(
            local_day(parsed),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn parse_date_param_rejects_garbage() {
        assert!(parse_date_param("yesterday").is_none());
        assert!(parse_date_param("2024-13-40").is_none());
    }
}
