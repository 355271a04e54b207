// Shared builders for raw logs and snapshots
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tracker_stats::models::{Counter, CounterKind, RawLog, RawSnapshot, TorrentsField};

pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
}

/// Connections + completed log from (time, connections, completed) triples.
pub fn log(entries: &[(DateTime<Utc>, u64, u64)]) -> RawLog {
    RawLog::new(
        entries.iter().map(|e| e.0).collect(),
        vec![
            Counter::series(
                CounterKind::Connections,
                entries.iter().map(|e| e.1).collect(),
            ),
            Counter::series(CounterKind::Completed, entries.iter().map(|e| e.2).collect()),
        ],
    )
    .unwrap()
}

pub fn empty_log() -> RawLog {
    log(&[])
}

/// RFC 3339 snapshot with a scalar torrents count.
pub fn snapshot(entries: &[(DateTime<Utc>, u64, u64)], torrents: u64) -> RawSnapshot {
    RawSnapshot {
        torrents: Some(TorrentsField::Count(torrents)),
        times: entries.iter().map(|e| e.0.to_rfc3339()).collect(),
        connections: entries.iter().map(|e| e.1).collect(),
        completed: entries.iter().map(|e| e.2).collect(),
    }
}
