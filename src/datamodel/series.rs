use std::collections::HashMap;

/// One decoded data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// A uniquely tagged sequence of samples, ordered by timestamp.
#[derive(Debug, Clone, Default)]
pub struct Series {
    pub tags: HashMap<String, String>,
    samples: Vec<Sample>,
}

impl Series {
    /// Samples are stably sorted, so equal timestamps keep their input order.
    pub fn new(tags: HashMap<String, String>, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|sample| sample.timestamp_ms);
        Self { tags, samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest and highest timestamps, or `None` without samples.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.timestamp_ms, last.timestamp_ms)),
            _ => None,
        }
    }
}
