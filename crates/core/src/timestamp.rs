//! Microsecond-precision timestamp type
//!
//! The store attaches a `Timestamp` to every coordinated write (the
//! "write-time marker") and uses it for ordering and pagination cursors.
//! Event times on messages use the same type.
//!
//! ## Precision
//!
//! Timestamps are stored as microseconds since Unix epoch (1970-01-01 00:00:00
//! UTC). This provides sufficient precision for ordering concurrent writes
//! while remaining representable in common time libraries.
//!
//! ## Serialized form
//!
//! Timestamps serialize to ISO-8601 strings. Deserialization accepts either
//! an ISO-8601 string or a raw integer microsecond count, so documents written
//! by other tooling round-trip regardless of which representation they chose.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::time::{SystemTime, UNIX_EPOCH};

/// Microsecond-precision timestamp
///
/// Represents a point in time as microseconds since Unix epoch.
/// This is the canonical time representation in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Create a timestamp for the current moment
    ///
    /// Uses system time. Returns epoch (0) if the system clock is before
    /// Unix epoch (e.g. the clock went backwards due to NTP adjustment).
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Parse an ISO-8601 / RFC 3339 string
    ///
    /// Returns `None` for unparseable strings and for instants before the
    /// Unix epoch, which this type cannot represent.
    pub fn parse_iso8601(s: &str) -> Option<Self> {
        let dt = DateTime::parse_from_rfc3339(s).ok()?;
        let micros = dt.timestamp_micros();
        if micros < 0 {
            return None;
        }
        Some(Timestamp(micros as u64))
    }

    /// Format as an ISO-8601 string with microsecond precision
    pub fn to_iso8601(&self) -> String {
        // Values past chrono's range (year 262143) fall back to the epoch.
        let dt: DateTime<Utc> = Utc
            .timestamp_micros(self.0 as i64)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH);
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl From<u64> for Timestamp {
    /// Create from raw microseconds
    fn from(micros: u64) -> Self {
        Timestamp::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    /// Extract raw microseconds
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

// ============================================================================
// Serde: ISO-8601 string out, string or integer micros in
// ============================================================================

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("an ISO-8601 string or integer microseconds since epoch")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Timestamp, E> {
        Timestamp::parse_iso8601(v)
            .ok_or_else(|| E::custom(format!("invalid ISO-8601 timestamp: {v:?}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Timestamp, E> {
        Ok(Timestamp::from_micros(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Timestamp, E> {
        if v < 0 {
            return Err(E::custom("timestamp before Unix epoch"));
        }
        Ok(Timestamp::from_micros(v as u64))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_epoch() {
        assert_eq!(Timestamp::EPOCH.as_micros(), 0);
        assert_eq!(Timestamp::EPOCH.as_secs(), 0);
    }

    #[test]
    fn test_timestamp_from_secs() {
        let ts = Timestamp::from_secs(1000);
        assert_eq!(ts.as_secs(), 1000);
        assert_eq!(ts.as_micros(), 1_000_000_000);
    }

    #[test]
    fn test_timestamp_now_advances() {
        let before = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let after = Timestamp::now();
        assert!(after > before, "time should advance");
    }

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::from_micros(100);
        let t2 = Timestamp::from_micros(200);
        let t3 = Timestamp::from_micros(100);

        assert!(t1 < t2);
        assert_eq!(t1, t3);
        assert!(t1.is_before(t2));
        assert!(t2.is_after(t1));
    }

    #[test]
    fn test_iso8601_round_trip() {
        let ts = Timestamp::from_micros(1_700_000_000_123_456);
        let formatted = ts.to_iso8601();
        let parsed = Timestamp::parse_iso8601(&formatted).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn test_parse_iso8601_with_offset() {
        let ts = Timestamp::parse_iso8601("2024-01-01T03:00:00+03:00").unwrap();
        assert_eq!(ts, Timestamp::parse_iso8601("2024-01-01T00:00:00Z").unwrap());
    }

    #[test]
    fn test_parse_iso8601_invalid() {
        assert!(Timestamp::parse_iso8601("not a time").is_none());
        assert!(Timestamp::parse_iso8601("1969-12-31T00:00:00Z").is_none());
    }

    #[test]
    fn test_serialize_to_string() {
        let ts = Timestamp::from_secs(1_700_000_000);
        let json = serde_json::to_value(ts).unwrap();
        assert!(json.is_string());
    }

    #[test]
    fn test_deserialize_from_string() {
        let ts: Timestamp = serde_json::from_value(serde_json::json!("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(ts.as_secs(), 1_704_067_200);
    }

    #[test]
    fn test_deserialize_from_integer_micros() {
        let ts: Timestamp = serde_json::from_value(serde_json::json!(1_234_567_u64)).unwrap();
        assert_eq!(ts.as_micros(), 1_234_567);
    }

    #[test]
    fn test_serde_round_trip() {
        let ts = Timestamp::from_micros(1_234_567_890);
        let json = serde_json::to_string(&ts).unwrap();
        let restored: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, restored);
    }

    #[test]
    fn test_timestamp_default() {
        assert_eq!(Timestamp::default(), Timestamp::EPOCH);
    }
}
