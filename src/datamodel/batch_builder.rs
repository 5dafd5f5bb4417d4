use super::labels::{format_labels, normalize_labels};
use super::replay_datetime::{ReplayDateTime, ReplayDateTimeExt};
use super::series::Series;
use crate::error::ConfigError;
use crate::parsing::prometheus::remote_write_models::{Label, Sample, TimeSeries, WriteRequest};
use std::time::Duration;
use tracing::debug;

/// Half-open interval `[start_ms, end_ms)`.
///
/// `end_ms` is `None` for the last representable window, when
/// `start_ms + span` would overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: Option<i64>,
}

impl TimeWindow {
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && self.end_ms.is_none_or(|end| timestamp_ms < end)
    }
}

/// A write request covering one window, plus what the logs need to know about it.
#[derive(Debug, Clone)]
pub struct WindowBatch {
    pub window: TimeWindow,
    pub request: WriteRequest,
    pub samples: usize,
}

/// Splits the series of one input file into write requests bounded in time.
///
/// Window boundaries are multiples of the span counted from the Unix epoch,
/// so the same data always lands in the same windows, whatever else the
/// input file contains.
#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder {
    span_ms: i64,
}

impl BatchBuilder {
    pub fn new(span: Duration) -> Result<Self, ConfigError> {
        let span_ms = i64::try_from(span.as_millis()).map_err(|_| ConfigError::InvalidSpan(span))?;
        if span_ms <= 0 {
            return Err(ConfigError::InvalidSpan(span));
        }
        Ok(Self { span_ms })
    }

    pub fn span_ms(&self) -> i64 {
        self.span_ms
    }

    /// Start of the window holding `timestamp_ms`.
    pub fn aligned_start(&self, timestamp_ms: i64) -> i64 {
        timestamp_ms.div_euclid(self.span_ms) * self.span_ms
    }

    /// Lazily yields one batch per non-empty window, in increasing window order.
    pub fn build<'a>(&self, series: &'a [Series]) -> WindowedBatches<'a> {
        let labels = series
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Vec::new()
                } else {
                    normalize_labels(&s.tags)
                }
            })
            .collect();

        WindowedBatches {
            builder: *self,
            series,
            labels,
            cursors: vec![0; series.len()],
        }
    }
}

/// Global lowest and highest timestamps over all series.
pub fn time_range(series: &[Series]) -> Option<(i64, i64)> {
    series
        .iter()
        .filter_map(Series::time_range)
        .reduce(|(low, high), (l, h)| (low.min(l), high.max(h)))
}

/// Iterator returned by [`BatchBuilder::build`].
///
/// Each series keeps a cursor on its first sample not yet emitted. Since the
/// samples of a series are sorted, a window takes a contiguous run from the
/// cursor and the concatenation of all batches preserves the series order.
pub struct WindowedBatches<'a> {
    builder: BatchBuilder,
    series: &'a [Series],
    labels: Vec<Vec<Label>>,
    cursors: Vec<usize>,
}

impl WindowedBatches<'_> {
    fn lowest_remaining(&self) -> Option<i64> {
        self.series
            .iter()
            .zip(&self.cursors)
            .filter_map(|(series, &cursor)| series.samples().get(cursor))
            .map(|sample| sample.timestamp_ms)
            .min()
    }
}

impl Iterator for WindowedBatches<'_> {
    type Item = WindowBatch;

    fn next(&mut self) -> Option<Self::Item> {
        // Windows without any sample are skipped by jumping straight to the
        // window of the lowest remaining timestamp.
        let start_ms = self.builder.aligned_start(self.lowest_remaining()?);
        let window = TimeWindow {
            start_ms,
            end_ms: start_ms.checked_add(self.builder.span_ms),
        };

        let mut request = WriteRequest {
            timeseries: Vec::new(),
        };
        let mut window_samples = 0;

        for (index, series) in self.series.iter().enumerate() {
            let from = self.cursors[index];
            let remaining = &series.samples()[from..];
            let taken = remaining.partition_point(|sample| window.contains(sample.timestamp_ms));
            if taken == 0 {
                continue;
            }
            self.cursors[index] = from + taken;

            let samples: Vec<Sample> = remaining[..taken]
                .iter()
                .map(|sample| Sample {
                    value: sample.value,
                    timestamp: sample.timestamp_ms,
                })
                .collect();
            let labels = self.labels[index].clone();

            debug!(
                "Time series {{{}}} has {} samples in time range [{}, {}]",
                format_labels(&labels),
                samples.len(),
                ReplayDateTime::from_unix_milliseconds_i64(remaining[0].timestamp_ms),
                ReplayDateTime::from_unix_milliseconds_i64(remaining[taken - 1].timestamp_ms),
            );

            window_samples += samples.len();
            request.timeseries.push(TimeSeries { labels, samples });
        }

        Some(WindowBatch {
            window,
            request,
            samples: window_samples,
        })
    }
}
