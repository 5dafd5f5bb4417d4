//! Decoder for the JSON dumps written by promdump.
//!
//! A dump is an array of sample streams:
//!
//! ```json
//! [{"metric": {"__name__": "up", "job": "node"}, "values": [[1704067200.123, "1"]]}]
//! ```
//!
//! Timestamps are seconds with millisecond precision, values are strings so
//! that `NaN` and `±Inf` survive the JSON encoding.

use crate::datamodel::{Sample, Series};
use crate::error::InputError;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const MILLIS_DIGITS: usize = 3;

#[derive(Deserialize)]
struct SampleStream {
    #[serde(default)]
    metric: HashMap<String, String>,
    #[serde(default)]
    values: Vec<(DumpTimestamp, DumpValue)>,
}

struct DumpTimestamp(i64);

impl<'de> Deserialize<'de> for DumpTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // With arbitrary_precision the number keeps its source text
        let number = serde_json::Number::deserialize(deserializer)?;
        let text = number.to_string();
        seconds_text_to_millis(&text)
            .map(DumpTimestamp)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", text)))
    }
}

/// Converts `"1704067200.123"` to `1704067200123` without going through a float.
/// Digits beyond the millisecond are dropped.
fn seconds_text_to_millis(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let seconds: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut millis_text: String = fraction.chars().take(MILLIS_DIGITS).collect();
    while millis_text.len() < MILLIS_DIGITS {
        millis_text.push('0');
    }
    let millis: i64 = millis_text.parse().ok()?;

    let magnitude = seconds.checked_mul(1000)?.checked_add(millis)?;
    Some(if negative { -magnitude } else { magnitude })
}

struct DumpValue(f64);

impl<'de> Deserialize<'de> for DumpValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(number) => number
                .as_f64()
                .map(DumpValue)
                .ok_or_else(|| de::Error::custom(format!("invalid sample value: {}", number))),
            serde_json::Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map(DumpValue)
                .map_err(|_| de::Error::custom(format!("invalid sample value: {:?}", text))),
            other => Err(de::Error::custom(format!("invalid sample value: {}", other))),
        }
    }
}

impl SampleStream {
    fn into_series(self) -> Series {
        let samples = self
            .values
            .into_iter()
            .map(|(DumpTimestamp(timestamp_ms), DumpValue(value))| Sample::new(timestamp_ms, value))
            .collect();
        Series::new(self.metric, samples)
    }
}

/// Decodes a whole dump held in memory.
pub fn decode_series(data: &[u8]) -> Result<Vec<Series>, serde_json::Error> {
    let streams: Vec<SampleStream> = serde_json::from_slice(data)?;
    Ok(streams.into_iter().map(SampleStream::into_series).collect())
}

/// Reads and decodes one dump file. Decoding runs on the blocking pool.
pub async fn read_series_file(path: &Path) -> Result<Vec<Series>, InputError> {
    let contents = tokio::fs::read(path).await.map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let decode_path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        decode_series(&contents).map_err(|source| InputError::Decode {
            path: decode_path,
            source,
        })
    })
    .await
    .map_err(|err| InputError::Task {
        path: path.to_path_buf(),
        details: err.to_string(),
    })?
}
