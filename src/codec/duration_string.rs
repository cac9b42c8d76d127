//! `chrono::Duration` in the constant time-span layout `[-][d.]hh:mm:ss[.fffffff]`.
//!
//! The fraction is always seven digits (100 ns ticks) when present, and the
//! day component only appears for spans of a day or longer. Parsing also
//! accepts `hh:mm`, a bare day count, and fractions shorter than seven digits.
//!
//! Precision below one tick is truncated on write, so a duration carrying
//! sub-100 ns nanoseconds does not compare equal after a round trip.

use chrono::Duration;
use serde::{de, Deserialize, Deserializer, Serializer};

use super::CodecError;

const NANOS_PER_TICK: u32 = 100;
const TICK_DIGITS: usize = 7;
const SECONDS_PER_DAY: u64 = 86_400;

/// Formats a duration in the persisted layout.
pub fn format(value: &Duration) -> String {
    let seconds = value.num_seconds().unsigned_abs();
    let ticks = value.subsec_nanos().unsigned_abs() / NANOS_PER_TICK;

    let mut out = String::new();
    if (value.num_seconds() < 0 || value.subsec_nanos() < 0) && (seconds > 0 || ticks > 0) {
        out.push('-');
    }

    let days = seconds / SECONDS_PER_DAY;
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600 % 24,
        seconds / 60 % 60,
        seconds % 60
    ));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }

    out
}

/// Parses a persisted duration.
pub fn parse(text: &str) -> Result<Duration, CodecError> {
    let invalid = || CodecError::InvalidDuration(text.to_string());

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (days, hours, minutes, seconds, ticks) = match body.split_once(':') {
        None => (number(body).ok_or_else(invalid)?, 0, 0, 0, 0),
        Some((head, tail)) => {
            let (days, hours) = match head.split_once('.') {
                Some((days, hours)) => (number(days), number(hours)),
                None => (Some(0), number(head)),
            };

            let (minutes, rest) = match tail.split_once(':') {
                Some((minutes, rest)) => (number(minutes), Some(rest)),
                None => (number(tail), None),
            };

            let (seconds, ticks) = match rest {
                None => (Some(0), Some(0)),
                Some(rest) => match rest.split_once('.') {
                    Some((seconds, fraction)) => (number(seconds), fraction_ticks(fraction)),
                    None => (number(rest), Some(0)),
                },
            };

            (
                days.ok_or_else(invalid)?,
                hours.filter(|h| *h < 24).ok_or_else(invalid)?,
                minutes.filter(|m| *m < 60).ok_or_else(invalid)?,
                seconds.filter(|s| *s < 60).ok_or_else(invalid)?,
                ticks.ok_or_else(invalid)?,
            )
        }
    };

    let out_of_range = || CodecError::DurationOutOfRange(text.to_string());
    let total_seconds = days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|s| s.checked_add(hours * 3600 + minutes * 60 + seconds))
        .and_then(|s| i64::try_from(s).ok())
        .ok_or_else(out_of_range)?;

    let magnitude = Duration::try_seconds(total_seconds)
        .ok_or_else(out_of_range)?
        .checked_add(&Duration::nanoseconds(ticks as i64 * NANOS_PER_TICK as i64))
        .ok_or_else(out_of_range)?;

    Ok(if negative { -magnitude } else { magnitude })
}

fn number(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn fraction_ticks(text: &str) -> Option<u64> {
    if text.len() > TICK_DIGITS {
        return None;
    }
    let ticks = number(text)?;
    Some(ticks * 10u64.pow((TICK_DIGITS - text.len()) as u32))
}

pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(de::Error::custom)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse(&text))
            .transpose()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format(&Duration::zero()), "00:00:00");
    }

    #[test]
    fn test_format_clock_only() {
        let value = Duration::hours(2) + Duration::minutes(3) + Duration::seconds(4);
        assert_eq!(format(&value), "02:03:04");
    }

    #[test]
    fn test_format_days_and_ticks() {
        let value = Duration::days(1)
            + Duration::hours(2)
            + Duration::minutes(3)
            + Duration::seconds(4)
            + Duration::milliseconds(500);
        assert_eq!(format(&value), "1.02:03:04.5000000");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format(&Duration::seconds(-1)), "-00:00:01");
        assert_eq!(format(&Duration::milliseconds(-250)), "-00:00:00.2500000");
    }

    #[test]
    fn test_format_sub_tick_is_zero() {
        assert_eq!(format(&Duration::nanoseconds(-50)), "00:00:00");
    }

    #[test]
    fn test_round_trip_truncates_to_ticks() {
        let value = Duration::seconds(1) + Duration::nanoseconds(250);
        let back = parse(&format(&value)).unwrap();
        assert_eq!(back, Duration::seconds(1) + Duration::nanoseconds(200));
    }

    #[test]
    fn test_parse_full_layout() {
        let parsed = parse("1.02:03:04.5000000").unwrap();
        assert_eq!(
            parsed,
            Duration::days(1)
                + Duration::hours(2)
                + Duration::minutes(3)
                + Duration::seconds(4)
                + Duration::milliseconds(500)
        );
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!(parse("3").unwrap(), Duration::days(3));
        assert_eq!(parse("01:30").unwrap(), Duration::minutes(90));
        assert_eq!(parse("00:00:01.5").unwrap(), Duration::milliseconds(1500));
        assert_eq!(parse("-00:00:01").unwrap(), Duration::seconds(-1));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for text in ["", "-", "24:00:00", "00:60:00", "00:00:60", "1.2.3", "00:00:00.12345678", "ab:cd:ef"] {
            assert!(parse(text).is_err(), "expected error for {text:?}");
        }
    }

    #[test]
    fn test_parse_inverts_format() {
        let values = [
            Duration::zero(),
            Duration::milliseconds(1),
            Duration::days(400) + Duration::nanoseconds(100),
            -(Duration::hours(26) + Duration::microseconds(7)),
        ];
        for value in values {
            assert_eq!(parse(&format(&value)).unwrap(), value);
        }
    }
}
