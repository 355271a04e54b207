// Domain models: raw counter log, selection, resampled series

mod raw_log;
mod selection;
mod series;

pub use raw_log::{
    Counter, CounterKind, CounterValues, LogError, RawLog, RawSnapshot, TRACKER_TIME_FORMAT,
    TorrentsField, parse_timestamp,
};
pub use selection::{Granularity, Lookback, Selection};
pub use series::{GridPoint, ResampledSeries};
