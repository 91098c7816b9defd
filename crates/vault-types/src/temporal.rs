use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Persisted layout of every record timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Second-resolution UTC timestamp.
///
/// Timestamps are persisted as fixed-layout strings rather than a
/// store-native temporal type so the document shape stays engine-agnostic.
/// Sub-second precision is dropped on construction, which keeps
/// `parse(format(t)) == t` for every value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Truncate a UTC datetime to whole seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let naive = dt.naive_utc();
        Self(naive.with_nanosecond(0).unwrap_or(naive))
    }

    /// Build from seconds since the UNIX epoch.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(Self::from_datetime)
    }

    /// Parse the `YYYY-MM-DD HH:MM:SS` layout.
    ///
    /// Every field must be zero-padded to its full width, with nothing
    /// before or after, so the stored string is always `format()` of the
    /// parsed value.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidTimestamp {
            input: s.to_string(),
        };
        if !has_fixed_layout(s) {
            return Err(invalid());
        }
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// This timestamp shifted forward by `secs` seconds, or `None` past
    /// the representable range.
    pub fn checked_plus_seconds(&self, secs: i64) -> Option<Self> {
        let delta = Duration::try_seconds(secs)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    pub fn format(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn has_fixed_layout(s: &str) -> bool {
    const SHAPE: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";
    s.len() == SHAPE.len()
        && s.bytes().zip(SHAPE.iter()).all(|(b, &want)| match want {
            b'd' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.format())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timestamp formatted as YYYY-MM-DD HH:MM:SS")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Timestamp::parse(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
