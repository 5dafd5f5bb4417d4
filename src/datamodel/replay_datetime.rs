pub type ReplayDateTime = hifitime::Epoch;

use hifitime::{UNIX_REF_EPOCH, Unit};

pub trait ReplayDateTimeExt {
    fn from_unix_milliseconds_i64(timestamp: i64) -> Self;
}

impl ReplayDateTimeExt for ReplayDateTime {
    fn from_unix_milliseconds_i64(timestamp: i64) -> Self {
        Self::from_utc_duration(UNIX_REF_EPOCH.to_utc_duration() + timestamp * Unit::Millisecond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milliseconds_roundtrip() {
        let test_cases: &[i64] = &[
            0,
            1000,          // Small value
            1704067200000, // Jan 1, 2024 00:00:00 UTC
            1704067200123, // With subsecond precision
        ];

        for &input_ms in test_cases {
            let epoch = ReplayDateTime::from_unix_milliseconds_i64(input_ms);
            let output_ms = epoch.to_unix_milliseconds().round() as i64;
            assert_eq!(
                input_ms, output_ms,
                "from_unix_milliseconds_i64 should roundtrip for {}",
                input_ms
            );
        }
    }
}
