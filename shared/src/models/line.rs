//! Pulse log line parser.
//!
//! Parses lines of the form:
//! - `2024-01-01 10:00:00 - Pulses_per_10s: 42`
//! - `2024-01-01 10:00:10 - Pulses_per_10s: -1`

use super::measurement::{Measurement, LINE_SEPARATOR, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while parsing a log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line does not contain the `" - Pulses_per_10s: "` separator.
    #[error("Missing separator ' - Pulses_per_10s: '")]
    MissingSeparator,

    /// The separator occurs more than once.
    #[error("Separator ' - Pulses_per_10s: ' occurs more than once")]
    RepeatedSeparator,

    /// The timestamp is not a valid `YYYY-MM-DD HH:MM:SS` date-time.
    #[error("Invalid timestamp: '{0}'. Expected 'YYYY-MM-DD HH:MM:SS'")]
    InvalidTimestamp(String),

    /// The value is not a base-10 integer.
    #[error("Invalid value: '{0}'. Expected an integer")]
    InvalidValue(String),

    /// The line is not valid UTF-8.
    #[error("Line is not valid UTF-8")]
    InvalidEncoding,
}

/// Parses one pulse log line into a `Measurement`.
///
/// Surrounding whitespace of the value (including a trailing `\r`) is
/// ignored; the timestamp must match `YYYY-MM-DD HH:MM:SS` exactly.
///
/// # Errors
///
/// Returns a `ParseError` if:
/// - The separator is absent or repeated
/// - The timestamp does not match the expected pattern
/// - The value is not an integer
///
/// # Examples
///
/// ```
/// use shared::models::parse_line;
///
/// let measurement = parse_line("2024-01-01 10:00:00 - Pulses_per_10s: 42").unwrap();
/// assert_eq!(measurement.value, 42);
/// ```
pub fn parse_line(line: &str) -> Result<Measurement, ParseError> {
    let (timestamp, value) = line
        .split_once(LINE_SEPARATOR)
        .ok_or(ParseError::MissingSeparator)?;

    if value.contains(LINE_SEPARATOR) {
        return Err(ParseError::RepeatedSeparator);
    }

    let timestamp = parse_timestamp(timestamp)?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidValue(value.trim().to_string()))?;

    Ok(Measurement::new(timestamp, value))
}

fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ParseError> {
    if !has_timestamp_shape(input) {
        return Err(ParseError::InvalidTimestamp(input.to_string()));
    }

    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(input.to_string()))
}

/// Checks the fixed-width `YYYY-MM-DD HH:MM:SS` layout; chrono alone also
/// accepts unpadded fields.
fn has_timestamp_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_valid_line() {
        let measurement = parse_line("2024-01-01 10:00:00 - Pulses_per_10s: 42").unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(measurement.timestamp, expected);
        assert_eq!(measurement.value, 42);
    }

    #[test]
    fn test_parse_negative_value() {
        let measurement = parse_line("2024-01-01 10:00:00 - Pulses_per_10s: -7").unwrap();
        assert_eq!(measurement.value, -7);
    }

    #[test]
    fn test_parse_trims_value_whitespace() {
        let measurement = parse_line("2024-01-01 10:00:00 - Pulses_per_10s:   12 \r").unwrap();
        assert_eq!(measurement.value, 12);
    }

    #[test]
    fn test_parse_missing_separator() {
        assert_eq!(parse_line("garbage"), Err(ParseError::MissingSeparator));
        assert_eq!(
            parse_line("2024-01-01 10:00:00 - Pulses: 3"),
            Err(ParseError::MissingSeparator)
        );
    }

    #[test]
    fn test_parse_repeated_separator() {
        let result = parse_line(
            "2024-01-01 10:00:00 - Pulses_per_10s: 1 - Pulses_per_10s: 2",
        );
        assert_eq!(result, Err(ParseError::RepeatedSeparator));
    }

    #[test]
    fn test_parse_non_integer_value() {
        let result = parse_line("2024-01-01 10:00:00 - Pulses_per_10s: abc");
        assert_eq!(result, Err(ParseError::InvalidValue("abc".to_string())));

        let result = parse_line("2024-01-01 10:00:00 - Pulses_per_10s: 1.5");
        assert!(matches!(result, Err(ParseError::InvalidValue(_))));

        let result = parse_line("2024-01-01 10:00:00 - Pulses_per_10s: ");
        assert!(matches!(result, Err(ParseError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        for line in [
            "2024-1-1 10:00:00 - Pulses_per_10s: 1",
            "2024-01-01T10:00:00 - Pulses_per_10s: 1",
            "2024-13-01 10:00:00 - Pulses_per_10s: 1",
            "2024-02-30 10:00:00 - Pulses_per_10s: 1",
            "2024-01-01 24:00:00 - Pulses_per_10s: 1",
            " 2024-01-01 10:00:00 - Pulses_per_10s: 1",
        ] {
            assert!(
                matches!(parse_line(line), Err(ParseError::InvalidTimestamp(_))),
                "expected invalid timestamp for {line:?}"
            );
        }
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidValue("abc".to_string());
        assert_eq!(err.to_string(), "Invalid value: 'abc'. Expected an integer");
    }
}
