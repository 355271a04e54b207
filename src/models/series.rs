// Resampled output: grid points and the series they form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CounterKind, Selection};

/// One regularly spaced point; `values` is index-aligned with the log's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPoint {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResampledSeries {
    pub selection: Selection,
    pub kinds: Vec<CounterKind>,
    pub points: Vec<GridPoint>,
    /// Final cursor position into the raw log.
    pub consumed: usize,
}

impl ResampledSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Values of one counter across the grid, or None if the log has no such counter.
    pub fn column(&self, kind: CounterKind) -> Option<Vec<u64>> {
        let idx = self.kinds.iter().position(|k| *k == kind)?;
        Some(self.points.iter().map(|p| p.values[idx]).collect())
    }
}
