//! String codecs for values the store persists as canonical text.
//!
//! Identifiers, offset timestamps and durations are written as strings rather
//! than native BSON types so that documents stay readable by every service
//! sharing the database. Use them as serde `with` modules:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Booking {
//!     #[serde(rename = "_id", with = "codec::uuid_string")]
//!     id: Uuid,
//!     #[serde(with = "codec::datetime_offset_string")]
//!     starts_at: DateTime<FixedOffset>,
//!     #[serde(with = "codec::duration_string")]
//!     length: chrono::Duration,
//! }
//! ```
//!
//! Each codec has an `option` submodule for `Option<_>` fields; pair it with
//! `#[serde(default)]` so missing keys decode as `None`.

pub mod datetime_offset_string;
pub mod duration_string;
pub mod uuid_string;

use thiserror::Error;

/// Errors raised while parsing a persisted string value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid duration '{0}', expected [-][d.]hh:mm:ss[.fffffff]")]
    InvalidDuration(String),

    #[error("duration '{0}' is out of range")]
    DurationOutOfRange(String),
}
