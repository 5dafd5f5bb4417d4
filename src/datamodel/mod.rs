pub mod batch_builder;
pub mod labels;
pub mod replay_datetime;
pub mod series;

pub use batch_builder::{BatchBuilder, TimeWindow, WindowBatch, WindowedBatches, time_range};
pub use labels::normalize_labels;
pub use replay_datetime::{ReplayDateTime, ReplayDateTimeExt};
pub use series::{Sample, Series};
