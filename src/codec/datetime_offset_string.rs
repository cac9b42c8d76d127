//! `DateTime<FixedOffset>` as ISO-8601 text with an explicit offset.
//!
//! Written as `yyyy-mm-ddThh:mm:ss[.f{1,7}]+hh:mm`: the fraction has 100 ns
//! resolution with trailing zeros trimmed, and a zero offset is spelled
//! `+00:00`. Anything RFC 3339 accepts is read back, including `Z`.
//!
//! Nanoseconds below one tick are truncated on write, so such values do not
//! compare equal after a round trip. The offset carries whole minutes only;
//! serializing an offset with a seconds component is an error.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{de, ser, Deserialize, Deserializer, Serializer};

const NANOS_PER_TICK: u32 = 100;

/// Formats a timestamp in the persisted layout.
pub fn format(value: &DateTime<FixedOffset>) -> String {
    let mut out = value.format("%Y-%m-%dT%H:%M:%S").to_string();

    // nanosecond() exceeds 1e9 only inside a leap second
    let ticks = (value.nanosecond() % 1_000_000_000) / NANOS_PER_TICK;
    if ticks > 0 {
        let fraction = format!("{:07}", ticks);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out.push_str(&value.format("%:z").to_string());
    out
}

/// Parses a persisted timestamp.
pub fn parse(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text)
}

pub fn serialize<S: Serializer>(
    value: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let offset = value.offset().local_minus_utc();
    if offset % 60 != 0 {
        return Err(ser::Error::custom(format!(
            "offset of {} seconds is not a whole number of minutes",
            offset
        )));
    }
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<FixedOffset>, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(de::Error::custom)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse(&text))
            .transpose()
            .map_err(de::Error::custom)
    }
}
