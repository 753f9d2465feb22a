//! `NumericDate`: seconds since the Unix epoch, truncated to a precision
//!
//! The wire form is a JSON number. Whole seconds are written as an integer;
//! finer precisions append exactly `log10(1s / precision)` fraction digits.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Default precision for new dates and for the JSON encoding
pub const DEFAULT_PRECISION: Duration = Duration::from_secs(1);

/// A point in time as used by the `exp`, `nbf` and `iat` claims
///
/// Two dates are equal when they denote the same instant, whatever precision
/// they encode with.
#[derive(Clone, Copy)]
pub struct NumericDate {
    time: DateTime<Utc>,
    precision: Duration,
}

impl NumericDate {
    /// Create a date truncated to whole seconds
    pub fn new(time: DateTime<Utc>) -> Self {
        Self::with_precision(time, DEFAULT_PRECISION)
    }

    /// Create a date truncated to `precision`
    ///
    /// A zero precision is treated as one nanosecond.
    pub fn with_precision(time: DateTime<Utc>, precision: Duration) -> Self {
        let precision = precision.max(Duration::from_nanos(1));
        Self {
            time: truncate(time, precision),
            precision,
        }
    }

    /// The current time, truncated to whole seconds
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Create a date from whole seconds since the epoch
    pub fn from_timestamp(seconds: i64) -> Option<Self> {
        DateTime::from_timestamp(seconds, 0).map(Self::new)
    }

    /// Create a date from fractional seconds since the epoch, truncated to
    /// whole seconds
    ///
    /// This is how time claims decode, so `1700000000.5` becomes `1700000000`.
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        Self::from_seconds_with_precision(seconds, DEFAULT_PRECISION)
    }

    /// Create a date from fractional seconds since the epoch, truncated to
    /// `precision`
    pub fn from_seconds_with_precision(seconds: f64, precision: Duration) -> Option<Self> {
        exact_instant(seconds).map(|time| Self::with_precision(time, precision))
    }

    /// The instant this date denotes
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// The precision used when encoding
    pub fn precision(&self) -> Duration {
        self.precision
    }

    /// Same instant, encoded with a different precision (truncating further if coarser)
    pub fn to_precision(&self, precision: Duration) -> Self {
        Self::with_precision(self.time, precision)
    }

    /// Number of fraction digits in the wire form
    pub fn fraction_digits(&self) -> u32 {
        fraction_digits(self.precision)
    }

    /// The JSON text of this date, e.g. `1700000000` or `1700000000.250`
    pub fn to_json_number(&self) -> String {
        let seconds = self.time.timestamp();
        let digits = self.fraction_digits();
        if digits == 0 {
            return seconds.to_string();
        }

        let nanos = self.time.timestamp_subsec_nanos();
        let (sign, whole, nanos) = if seconds < 0 && nanos > 0 {
            // chrono floors: -1.25 is stored as -2 plus 0.75
            ("-", -(seconds + 1), 1_000_000_000 - nanos)
        } else if seconds < 0 {
            ("-", -seconds, 0)
        } else {
            ("", seconds, nanos)
        };
        let fraction = nanos / 10_u32.pow(9 - digits);
        format!("{sign}{whole}.{fraction:0width$}", width = digits as usize)
    }
}

// Shortest round-trip form recovers the digits the issuer wrote
fn exact_instant(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }

    let text = format!("{seconds}");
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let whole: i64 = whole.parse().ok()?;

    let digits = fraction.len().min(9);
    let mut nanos: i64 = if digits == 0 {
        0
    } else {
        fraction[..digits].parse::<i64>().ok()? * 10_i64.pow((9 - digits) as u32)
    };
    let mut secs = whole;
    if seconds < 0.0 && nanos > 0 {
        // -1.25 is one and a quarter seconds before the epoch
        secs -= 1;
        nanos = 1_000_000_000 - nanos;
    }

    DateTime::from_timestamp(secs, nanos as u32)
}

fn truncate(time: DateTime<Utc>, precision: Duration) -> DateTime<Utc> {
    let step = precision.as_nanos() as i128;
    let total = time.timestamp() as i128 * NANOS_PER_SEC + time.timestamp_subsec_nanos() as i128;
    let truncated = total - total.rem_euclid(step);

    let secs = truncated.div_euclid(NANOS_PER_SEC) as i64;
    let nanos = truncated.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or(time)
}

// floor(log10(1s / precision)) for precisions below one second
fn fraction_digits(precision: Duration) -> u32 {
    let step = precision.as_nanos();
    let mut scaled = step;
    let mut digits = 0;
    while scaled * 10 <= NANOS_PER_SEC as u128 {
        scaled *= 10;
        digits += 1;
    }
    digits
}

impl Deref for NumericDate {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.time
    }
}

impl From<DateTime<Utc>> for NumericDate {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time)
    }
}

impl PartialEq for NumericDate {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl Eq for NumericDate {}

impl PartialOrd for NumericDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

impl fmt::Debug for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumericDate({})", self.to_json_number())
    }
}

impl fmt::Display for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.time, f)
    }
}

impl Serialize for NumericDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.fraction_digits() == 0 {
            return serializer.serialize_i64(self.time.timestamp());
        }

        // Written verbatim so trailing fraction zeros survive
        let raw = RawValue::from_string(self.to_json_number()).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericDateVisitor)
    }
}

struct NumericDateVisitor;

impl Visitor<'_> for NumericDateVisitor {
    type Value = NumericDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON number of seconds since the Unix epoch")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        NumericDate::from_timestamp(v).ok_or_else(|| E::custom("timestamp out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .ok()
            .and_then(NumericDate::from_timestamp)
            .ok_or_else(|| E::custom("timestamp out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        NumericDate::from_seconds(v).ok_or_else(|| E::custom("timestamp out of range"))
    }
}
