// Step (last-observation-carried-forward) resampling of the raw log onto a regular grid.
//
// One forward-only cursor walks the log: seek past everything before the grid start, then at each
// grid point absorb the entries that belong to it. O(log length + grid length).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::models::{Counter, Granularity, GridPoint, RawLog, ResampledSeries, Selection};

/// Which raw entries are absorbed before a grid point is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Value at `g` is the latest entry with `timestamp <= g`.
    #[default]
    PointInTime,
    /// Value at `g` is the latest entry seen by the end of the bucket `[g, g + step)`.
    BucketClose,
}

impl SamplingMode {
    fn absorbs(self, granularity: Granularity, grid: DateTime<Utc>, t: DateTime<Utc>) -> bool {
        match self {
            SamplingMode::PointInTime => t <= grid,
            SamplingMode::BucketClose => granularity.contains(grid, t),
        }
    }
}

/// Grid covers `[now - lookback, now)` at one granularity step. Every call starts from scratch.
#[instrument(level = "debug", skip(log), fields(entries = log.len(), lookback_hours = selection.lookback.hours()))]
pub fn resample(
    log: &RawLog,
    selection: Selection,
    now: DateTime<Utc>,
    mode: SamplingMode,
) -> ResampledSeries {
    let granularity = selection.granularity;
    let step = granularity.step();
    let start = now - selection.lookback.duration();
    let times = log.times();
    let counters = log.counters();

    let mut last: Vec<u64> = counters.iter().map(Counter::initial).collect();
    let mut pos = 0usize;

    // Seek: entries before the grid only set the carried-forward baseline.
    while pos < times.len() && times[pos] < start {
        adopt(counters, pos, &mut last);
        pos += 1;
    }

    let mut points = Vec::with_capacity(selection.grid_len());
    let mut current = start;
    while current < now {
        while pos < times.len() && mode.absorbs(granularity, current, times[pos]) {
            adopt(counters, pos, &mut last);
            pos += 1;
        }
        points.push(GridPoint {
            timestamp: current,
            values: last.clone(),
        });
        current += step;
    }

    tracing::debug!(
        operation = "resample",
        points = points.len(),
        consumed = pos,
        "resample complete"
    );

    ResampledSeries {
        selection,
        kinds: log.kinds(),
        points,
        consumed: pos,
    }
}

fn adopt(counters: &[Counter], pos: usize, last: &mut [u64]) {
    for (slot, counter) in last.iter_mut().zip(counters) {
        if let Some(v) = counter.value_at(pos) {
            *slot = v;
        }
    }
}
