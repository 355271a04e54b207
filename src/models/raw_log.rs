// Raw counter log: tracker JSON wire format and the validated columnar log built from it.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format the tracker writes (local time, no offset).
pub const TRACKER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `torrents` is a single count in tracker snapshots; a per-entry series is also accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TorrentsField {
    Count(u64),
    Series(Vec<u64>),
}

/// Snapshot as served by the tracker (`database.json`): parallel, index-aligned arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torrents: Option<TorrentsField>,
    pub times: Vec<String>,
    pub connections: Vec<u64>,
    pub completed: Vec<u64>,
}

impl RawSnapshot {
    pub fn new(torrents: u64) -> Self {
        Self {
            torrents: Some(TorrentsField::Count(torrents)),
            times: vec![],
            connections: vec![],
            completed: vec![],
        }
    }

    /// Append one announce: connections always grows by one, completed only when the peer finished.
    pub fn record_connection(&mut self, at: DateTime<Local>, is_completed: bool) {
        self.times.push(at.format(TRACKER_TIME_FORMAT).to_string());

        let connections = self.connections.last().copied().unwrap_or(0) + 1;
        self.connections.push(connections);

        let mut completed = self.completed.last().copied().unwrap_or(0);
        if is_completed {
            completed += 1;
        }
        self.completed.push(completed);

        if let Some(TorrentsField::Series(torrents)) = &mut self.torrents {
            let last = torrents.last().copied().unwrap_or(0);
            torrents.push(last);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Connections,
    Completed,
    Torrents,
}

impl CounterKind {
    pub fn name(self) -> &'static str {
        match self {
            CounterKind::Connections => "connections",
            CounterKind::Completed => "completed",
            CounterKind::Torrents => "torrents",
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterValues {
    /// One value per log entry.
    Series(Vec<u64>),
    /// A gauge that holds for the whole snapshot.
    Constant(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub kind: CounterKind,
    pub values: CounterValues,
}

impl Counter {
    pub fn series(kind: CounterKind, values: Vec<u64>) -> Self {
        Self {
            kind,
            values: CounterValues::Series(values),
        }
    }

    pub fn constant(kind: CounterKind, value: u64) -> Self {
        Self {
            kind,
            values: CounterValues::Constant(value),
        }
    }

    /// Value before any entry has been observed.
    pub fn initial(&self) -> u64 {
        match self.values {
            CounterValues::Series(_) => 0,
            CounterValues::Constant(v) => v,
        }
    }

    pub fn value_at(&self, pos: usize) -> Option<u64> {
        match &self.values {
            CounterValues::Series(v) => v.get(pos).copied(),
            CounterValues::Constant(v) => Some(*v),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LogError {
    #[error("counter {counter} has {actual} values, expected {expected} (one per timestamp)")]
    LengthMismatch {
        counter: CounterKind,
        expected: usize,
        actual: usize,
    },
    #[error("invalid timestamp at index {index}: {value:?}")]
    InvalidTimestamp { index: usize, value: String },
}

/// Columnar raw log. Every series counter has exactly one value per timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawLog {
    times: Vec<DateTime<Utc>>,
    counters: Vec<Counter>,
}

impl RawLog {
    pub fn new(times: Vec<DateTime<Utc>>, counters: Vec<Counter>) -> Result<Self, LogError> {
        for c in &counters {
            if let CounterValues::Series(values) = &c.values
                && values.len() != times.len()
            {
                return Err(LogError::LengthMismatch {
                    counter: c.kind,
                    expected: times.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(Self { times, counters })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn kinds(&self) -> Vec<CounterKind> {
        self.counters.iter().map(|c| c.kind).collect()
    }

    /// Timestamps non-decreasing. Not enforced; the resampler assumes it.
    pub fn is_sorted(&self) -> bool {
        self.times.windows(2).all(|w| w[0] <= w[1])
    }
}

impl TryFrom<RawSnapshot> for RawLog {
    type Error = LogError;

    fn try_from(s: RawSnapshot) -> Result<Self, Self::Error> {
        let times = s
            .times
            .iter()
            .enumerate()
            .map(|(index, value)| {
                parse_timestamp(value).ok_or_else(|| LogError::InvalidTimestamp {
                    index,
                    value: value.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut counters = vec![
            Counter::series(CounterKind::Connections, s.connections),
            Counter::series(CounterKind::Completed, s.completed),
        ];
        match s.torrents {
            Some(TorrentsField::Count(n)) => {
                counters.push(Counter::constant(CounterKind::Torrents, n))
            }
            Some(TorrentsField::Series(v)) => counters.push(Counter::series(CounterKind::Torrents, v)),
            None => {}
        }
        RawLog::new(times, counters)
    }
}

impl From<&RawLog> for RawSnapshot {
    fn from(log: &RawLog) -> Self {
        let mut snapshot = RawSnapshot {
            torrents: None,
            times: log.times.iter().map(|t| t.to_rfc3339()).collect(),
            connections: vec![],
            completed: vec![],
        };
        for c in &log.counters {
            match (c.kind, &c.values) {
                (CounterKind::Connections, CounterValues::Series(v)) => {
                    snapshot.connections = v.clone()
                }
                (CounterKind::Completed, CounterValues::Series(v)) => {
                    snapshot.completed = v.clone()
                }
                (CounterKind::Torrents, CounterValues::Series(v)) => {
                    snapshot.torrents = Some(TorrentsField::Series(v.clone()))
                }
                (CounterKind::Torrents, CounterValues::Constant(n)) => {
                    snapshot.torrents = Some(TorrentsField::Count(*n))
                }
                (kind, CounterValues::Constant(n)) => {
                    let column = vec![*n; log.len()];
                    if kind == CounterKind::Connections {
                        snapshot.connections = column;
                    } else {
                        snapshot.completed = column;
                    }
                }
            }
        }
        snapshot
    }
}

/// RFC 3339, or the tracker's naive format interpreted in local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, TRACKER_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_connection_accumulates() {
        let mut s = RawSnapshot::new(2);
        let now = Local::now();
        for completed in [false, false, true, true, false] {
            s.record_connection(now, completed);
        }
        assert_eq!(s.connections, vec![1, 2, 3, 4, 5]);
        assert_eq!(s.completed, vec![0, 0, 1, 2, 2]);
        assert_eq!(s.times.len(), 5);
        assert_eq!(s.torrents, Some(TorrentsField::Count(2)));
    }

    #[test]
    fn scalar_torrents_becomes_constant_counter() {
        let s: RawSnapshot = serde_json::from_str(
            r#"{"torrents":3,"times":["2024-01-01T00:00:00Z"],"connections":[1],"completed":[0]}"#,
        )
        .unwrap();
        let log = RawLog::try_from(s).unwrap();
        assert_eq!(
            log.kinds(),
            vec![
                CounterKind::Connections,
                CounterKind::Completed,
                CounterKind::Torrents
            ]
        );
        assert_eq!(log.counters()[2].initial(), 3);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let s = RawSnapshot {
            torrents: None,
            times: vec!["2024-01-01T00:00:00Z".into(), "2024-01-01T00:01:00Z".into()],
            connections: vec![1, 2],
            completed: vec![0],
        };
        assert_eq!(
            RawLog::try_from(s).unwrap_err(),
            LogError::LengthMismatch {
                counter: CounterKind::Completed,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn bad_timestamp_reports_index() {
        let s = RawSnapshot {
            torrents: None,
            times: vec!["2024-01-01T00:00:00Z".into(), "yesterday".into()],
            connections: vec![1, 2],
            completed: vec![0, 0],
        };
        assert!(matches!(
            RawLog::try_from(s),
            Err(LogError::InvalidTimestamp { index: 1, .. })
        ));
    }

    #[test]
    fn naive_tracker_time_is_local() {
        let parsed = parse_timestamp("2022-08-19 12:30:00").unwrap();
        let expected = Local
            .with_ymd_and_hms(2022, 8, 19, 12, 30, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
    }
}
