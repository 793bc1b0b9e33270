use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Day/month/year, as used by most date fields.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
/// Day/month/year with a 24-hour clock.
pub const DEFAULT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
/// Day/month/year with a 12-hour clock and an `am`/`pm` marker.
pub const MERIDIEM_DATETIME_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

/// A non-empty date string that does not match the expected format.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("time data {value:?} does not match format {format:?}")]
pub struct FormatError {
    /// The raw value as received.
    pub value: String,
    /// The format it was parsed against.
    pub format: String,
    /// Underlying chrono error.
    #[source]
    pub source: chrono::ParseError,
}

/// Parse a datetime string, treating absent or empty input as `None`.
///
/// Periods are dropped before parsing, so `"10:30:00 a.m."` reads the same as
/// `"10:30:00 am"`. A date-only format yields midnight of that day.
pub fn parse_datetime(
    value: Option<&str>,
    format: &str,
) -> Result<Option<NaiveDateTime>, FormatError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => parse_normalized(raw, format).map(Some),
    }
}

/// Parse a date string, treating absent or empty input as `None`.
///
/// Goes through [`parse_datetime`] and keeps only the date portion, so both
/// functions reject the same malformed input.
pub fn parse_date(value: Option<&str>, format: &str) -> Result<Option<NaiveDate>, FormatError> {
    parse_datetime(value, format).map(|parsed| parsed.map(|dt| dt.date()))
}

fn parse_normalized(raw: &str, format: &str) -> Result<NaiveDateTime, FormatError> {
    let cleaned = raw.replace('.', "");
    let to_error = |source: chrono::ParseError| FormatError {
        value: raw.to_string(),
        format: format.to_string(),
        source,
    };

    match NaiveDateTime::parse_from_str(&cleaned, format) {
        Ok(parsed) => Ok(parsed),
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {
            NaiveDate::parse_from_str(&cleaned, format)
                .map(|date| date.and_time(NaiveTime::default()))
                .map_err(to_error)
        }
        Err(err) => Err(to_error(err)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Timelike};

    use super::*;

    #[test]
    fn absent_and_empty_are_none() {
        assert_eq!(parse_datetime(None, DEFAULT_DATETIME_FORMAT), Ok(None));
        assert_eq!(parse_datetime(Some(""), DEFAULT_DATETIME_FORMAT), Ok(None));
        assert_eq!(parse_date(None, DEFAULT_DATE_FORMAT), Ok(None));
        assert_eq!(parse_date(Some(""), DEFAULT_DATE_FORMAT), Ok(None));
    }

    #[test]
    fn stray_periods_in_meridiem_are_ignored() {
        let dotted = parse_datetime(Some("12/05/2020 10:30:00 a.m."), MERIDIEM_DATETIME_FORMAT)
            .unwrap()
            .unwrap();
        let plain = parse_datetime(Some("12/05/2020 10:30:00 am"), MERIDIEM_DATETIME_FORMAT)
            .unwrap()
            .unwrap();
        assert_eq!(dotted, plain);
        assert_eq!(dotted.day(), 12);
        assert_eq!(dotted.month(), 5);
        assert_eq!(dotted.hour(), 10);
        assert_eq!(dotted.minute(), 30);
    }

    #[test]
    fn afternoon_marker_shifts_hour() {
        let parsed = parse_datetime(Some("01/02/2021 03:15:09 p.m."), MERIDIEM_DATETIME_FORMAT)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.hour(), 15);
        assert_eq!(parsed.second(), 9);
    }

    #[test]
    fn default_datetime_format() {
        let parsed = parse_datetime(Some("31/12/2019 23:59:58"), DEFAULT_DATETIME_FORMAT)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.year(), 2019);
        assert_eq!(parsed.hour(), 23);
    }

    #[test]
    fn date_only_format_through_datetime_is_midnight() {
        let parsed = parse_datetime(Some("07/06/2020"), DEFAULT_DATE_FORMAT)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2020, 6, 7).unwrap());
    }

    #[test]
    fn date_truncates_datetime_format() {
        let parsed = parse_date(Some("15/08/1975 12:00:00 a.m."), MERIDIEM_DATETIME_FORMAT)
            .unwrap()
            .unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(1975, 8, 15).unwrap());
    }

    #[test]
    fn dates_round_trip_through_format() {
        for (y, m, d) in [(2020, 1, 1), (1999, 12, 31), (2024, 2, 29), (2016, 10, 5)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let text = date.format(DEFAULT_DATE_FORMAT).to_string();
            let parsed = parse_date(Some(&text), DEFAULT_DATE_FORMAT).unwrap();
            assert_eq!(parsed, Some(date));
        }
    }

    #[test]
    fn malformed_input_fails_the_same_way_for_both() {
        let dt_err = parse_datetime(Some("2020-05-12"), DEFAULT_DATE_FORMAT).unwrap_err();
        let date_err = parse_date(Some("2020-05-12"), DEFAULT_DATE_FORMAT).unwrap_err();
        assert_eq!(dt_err, date_err);
        assert_eq!(dt_err.value, "2020-05-12");
        assert_eq!(dt_err.format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn missing_time_for_datetime_format_is_an_error() {
        assert!(parse_datetime(Some("12/05/2020"), DEFAULT_DATETIME_FORMAT).is_err());
    }
}
