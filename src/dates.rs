//! Date helpers shared by forms and text output.
//!
//! The backend stores date-times in UTC. Forms work with a local calendar
//! date (`YYYY-MM-DD`) plus a wall-clock time (`HH:MM`), so values are
//! converted at the form boundary.

use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};

/// Time used when a form gives a date without an hour
pub const DEFAULT_TIME: &str = "12:00";

/// Current instant as an ISO string with milliseconds, e.g. `2025-01-15T10:30:00.000Z`
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Today's local date as `YYYY-MM-DD`
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// The date portion of an ISO string (`2025-01-15T10:30:00Z` gives `2025-01-15`).
pub fn date_only(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_only(value), "%Y-%m-%d").ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Parses a date or date-time into local time.
///
/// A bare `YYYY-MM-DD` is placed at local noon so that no offset can move it
/// to a neighbouring day. Date-times without an offset are read as local.
pub fn parse_date_local(value: &str) -> Option<DateTime<Local>> {
    parse_date_in(value, &Local)
}

fn parse_date_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if !value.contains('T') {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        let noon = date.and_hms_opt(12, 0, 0)?;
        return tz.from_local_datetime(&noon).earliest();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(tz));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Combines a local date and time into a UTC ISO string.
///
/// `time` defaults to [`DEFAULT_TIME`]. Returns `None` if either part does
/// not parse.
pub fn combine_date_and_time_to_iso(date: &str, time: Option<&str>) -> Option<String> {
    combine_in(date, time, &Local)
}

fn combine_in<Tz: TimeZone>(date: &str, time: Option<&str>, tz: &Tz) -> Option<String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = parse_time(time.unwrap_or(DEFAULT_TIME))?;
    let local = tz.from_local_datetime(&date.and_time(time)).earliest()?;
    Some(
        local
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Splits a stored date-time into the local `(YYYY-MM-DD, HH:MM)` pair a form edits.
pub fn split_local(value: &str) -> Option<(String, String)> {
    split_in(value, &Local)
}

fn split_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<(String, String)>
where
    Tz::Offset: std::fmt::Display,
{
    let dt = parse_date_in(value, tz)?;
    Some((
        dt.format("%Y-%m-%d").to_string(),
        dt.format("%H:%M").to_string(),
    ))
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `"January 2024"`; unparseable input is returned unchanged.
pub fn format_month_year(value: &str) -> String {
    match parse_date_local(value) {
        Some(dt) => format!("{} {}", MONTHS[dt.month0() as usize], dt.year()),
        None => value.to_string(),
    }
}

/// `"15 January 2025"`
pub fn format_date(value: &str) -> String {
    match parse_date_local(value) {
        Some(dt) => format!("{} {} {}", dt.day(), MONTHS[dt.month0() as usize], dt.year()),
        None => value.to_string(),
    }
}

/// `"15 January 2025, 14:30"` in local time
pub fn format_date_time(value: &str) -> String {
    match parse_date_local(value) {
        Some(dt) => format!(
            "{} {} {}, {}",
            dt.day(),
            MONTHS[dt.month0() as usize],
            dt.year(),
            dt.format("%H:%M")
        ),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_date_only() {
        assert_eq!(date_only("2025-01-15T10:30:00Z"), "2025-01-15");
        assert_eq!(date_only("2025-01-15"), "2025-01-15");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-01-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert!(parse_date("15/01/2025").is_none());
    }

    #[test]
    fn test_bare_date_lands_on_noon() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let dt = parse_date_in("2025-01-15", &tz).unwrap();
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.format("%H:%M").to_string(), "12:00");
    }

    #[test]
    fn test_combine_converts_to_utc() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            combine_in("2025-03-10", Some("14:30"), &tz).as_deref(),
            Some("2025-03-10T12:30:00.000Z")
        );
    }

    #[test]
    fn test_combine_defaults_to_noon() {
        assert_eq!(
            combine_in("2025-03-10", None, &Utc).as_deref(),
            Some("2025-03-10T12:00:00.000Z")
        );
    }

    #[test]
    fn test_combine_rejects_garbage() {
        assert!(combine_in("2025-13-10", Some("10:00"), &Utc).is_none());
        assert!(combine_in("2025-03-10", Some("25:00"), &Utc).is_none());
    }

    #[test]
    fn test_split_round_trips_combine() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let iso = combine_in("2025-12-31", Some("23:15"), &tz).unwrap();
        assert_eq!(
            split_in(&iso, &tz),
            Some(("2025-12-31".to_string(), "23:15".to_string()))
        );
    }

    #[test]
    fn test_split_naive_meal_time() {
        assert_eq!(
            split_in("2025-01-15T08:30:00", &Utc),
            Some(("2025-01-15".to_string(), "08:30".to_string()))
        );
    }

    #[test]
    fn test_format_month_year() {
        assert_eq!(format_month_year("2024-01-15"), "January 2024");
        assert_eq!(format_month_year("not a date"), "not a date");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-01-15"), "15 January 2025");
    }

    #[test]
    fn test_now_iso_is_rfc3339() {
        assert!(DateTime::parse_from_rfc3339(&now_iso()).is_ok());
        assert!(now_iso().ends_with('Z'));
    }
}
