// Granularity, lookback and the combined dashboard selection

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Grid step and matching-interval width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hour,
    Minute,
}

impl Granularity {
    pub fn step(self) -> Duration {
        match self {
            Granularity::Hour => Duration::hours(1),
            Granularity::Minute => Duration::minutes(1),
        }
    }

    /// Half-open interval rule: `grid <= t < grid + step`.
    pub fn contains(self, grid: DateTime<Utc>, t: DateTime<Utc>) -> bool {
        t >= grid && t < grid + self.step()
    }

    /// Parse a selection label. Unknown text falls back to `Minute`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "in hours" | "hours" | "hour" => Granularity::Hour,
            "in minutes" | "minutes" | "minute" => Granularity::Minute,
            _ => Granularity::Minute,
        }
    }
}

/// Total span of history covered by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookback {
    #[default]
    OneHour,
    FiveHours,
    OneDay,
    ThreeDays,
}

impl Lookback {
    pub const ALL: [Lookback; 4] = [
        Lookback::OneHour,
        Lookback::FiveHours,
        Lookback::OneDay,
        Lookback::ThreeDays,
    ];

    pub fn hours(self) -> i64 {
        match self {
            Lookback::OneHour => 1,
            Lookback::FiveHours => 5,
            Lookback::OneDay => 24,
            Lookback::ThreeDays => 72,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::hours(self.hours())
    }

    /// Parse a selection label (UI text or hour count). Unknown text falls back to `ThreeDays`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "last hour" | "1" | "1h" => Lookback::OneHour,
            "last five hours" | "5" | "5h" => Lookback::FiveHours,
            "last day" | "24" | "24h" => Lookback::OneDay,
            _ => Lookback::ThreeDays,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub granularity: Granularity,
    pub lookback: Lookback,
}

impl Selection {
    pub fn new(granularity: Granularity, lookback: Lookback) -> Self {
        Self {
            granularity,
            lookback,
        }
    }

    /// Number of grid points a resample with this selection emits.
    pub fn grid_len(&self) -> usize {
        let span = self.lookback.duration().num_seconds();
        let step = self.granularity.step().num_seconds();
        ((span + step - 1) / step) as usize
    }
}
