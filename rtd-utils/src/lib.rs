//! Shared utility functions for RTD crates.

/// Format-or-placeholder helpers shared by every table and card.
///
/// Optional measurements are "not yet measured", never zero, so every
/// renderer goes through these helpers instead of formatting inline.
pub mod fmt {
    /// Text shown wherever a value is absent.
    pub const PLACEHOLDER: &str = "N/A";

    /// Format a present value with `f`, or return the placeholder.
    pub fn or_placeholder<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
        match value {
            Some(v) => f(v),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Optional text; empty strings count as absent.
    pub fn text(value: Option<&str>) -> String {
        or_placeholder(value.filter(|s| !s.is_empty()), str::to_string)
    }

    /// Optional real formatted to exactly 2 decimals.
    pub fn fixed2(value: Option<f64>) -> String {
        or_placeholder(value, |v| format!("{:.2}", v))
    }

    /// Milliseconds rendered as seconds with 2 decimals and an `s` suffix.
    pub fn seconds(duration_ms: Option<u64>) -> String {
        or_placeholder(duration_ms, |ms| format!("{:.2}s", ms as f64 / 1000.0))
    }

    /// A percentage value (already scaled to 0..100) with 1 decimal.
    pub fn percent1(value: f64) -> String {
        format!("{:.1}%", value)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_seconds() {
            assert_eq!(seconds(Some(1500)), "1.50s");
            assert_eq!(seconds(Some(0)), "0.00s");
            assert_eq!(seconds(None), "N/A");
        }

        #[test]
        fn test_fixed2_keeps_zero() {
            assert_eq!(fixed2(Some(-10.256)), "-10.26");
            assert_eq!(fixed2(Some(0.0)), "0.00");
            assert_eq!(fixed2(None), PLACEHOLDER);
        }

        #[test]
        fn test_text_treats_empty_as_absent() {
            assert_eq!(text(Some("TC-001")), "TC-001");
            assert_eq!(text(Some("")), "N/A");
            assert_eq!(text(None), "N/A");
        }

        #[test]
        fn test_percent1() {
            assert_eq!(percent1(66.666), "66.7%");
            assert_eq!(percent1(100.0), "100.0%");
        }
    }
}

/// Timestamp utility functions
pub mod dates {
    use crate::error::TimestampError;
    use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
    use std::fmt::Display;

    /// Format used for every timestamp the client sends: RFC 3339, UTC, millis.
    pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    /// Naive formats the backend emits for `LocalDateTime` fields.
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    /// Locale-style rendering, e.g. "1/15/2024, 10:30:00 AM".
    pub const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

    /// Format a UTC timestamp for the wire.
    pub fn to_wire(dt: &DateTime<Utc>) -> String {
        dt.format(WIRE_FORMAT).to_string()
    }

    /// A timestamp as received from the backend.
    ///
    /// Naive values are wall-clock readings and are shown with the same
    /// digits in every zone. Only values that carry an offset move with
    /// the viewer's zone.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum WireTime {
        Naive(NaiveDateTime),
        Instant(DateTime<Utc>),
    }

    impl WireTime {
        /// Render using [`DISPLAY_FORMAT`], converting instants into `zone`.
        pub fn format_in<Tz: TimeZone>(&self, zone: &Tz) -> String
        where
            Tz::Offset: Display,
        {
            match self {
                WireTime::Naive(naive) => naive.format(DISPLAY_FORMAT).to_string(),
                WireTime::Instant(dt) => format_locale(&dt.with_timezone(zone)),
            }
        }

        /// The value in the shape it arrived in.
        pub fn to_wire(&self) -> String {
            match self {
                WireTime::Naive(naive) => naive.format(NAIVE_FORMATS[0]).to_string(),
                WireTime::Instant(dt) => to_wire(dt),
            }
        }
    }

    impl From<DateTime<Utc>> for WireTime {
        fn from(dt: DateTime<Utc>) -> Self {
            WireTime::Instant(dt)
        }
    }

    impl From<NaiveDateTime> for WireTime {
        fn from(naive: NaiveDateTime) -> Self {
            WireTime::Naive(naive)
        }
    }

    /// Parse a wire timestamp.
    ///
    /// Accepts RFC 3339 with an offset, or a timezone-naive ISO-8601
    /// date-time which stays naive.
    pub fn parse_wire(s: &str) -> Result<WireTime, TimestampError> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(WireTime::Instant(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
            .map(WireTime::Naive)
            .ok_or_else(|| TimestampError(s.to_string()))
    }

    /// Render a timestamp in the given zone using [`DISPLAY_FORMAT`].
    pub fn format_locale<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format(DISPLAY_FORMAT).to_string()
    }

    /// The `[end - days, end]` window.
    pub fn trailing_window(end: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        (end - Duration::days(days), end)
    }

    /// Serde adapter for optional wire timestamps.
    ///
    /// Use with `#[serde(default, with = "rtd_utils::dates::wire_opt")]`.
    pub mod wire_opt {
        use super::WireTime;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<WireTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(t) => serializer.serialize_str(&t.to_wire()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<WireTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) if !s.trim().is_empty() => {
                    super::parse_wire(&s).map(Some).map_err(D::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct TimestampError(pub String);

    impl fmt::Display for TimestampError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Timestamp error: unrecognized value {:?}", self.0)
        }
    }

    impl std::error::Error for TimestampError {}
}
