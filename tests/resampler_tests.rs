// Resampler properties: grid shape, LOCF values, idempotence, cursor bounds, scenarios

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{at, empty_log, log};
use tracker_stats::models::{Counter, CounterKind, Granularity, Lookback, RawLog, Selection};
use tracker_stats::resampler::{SamplingMode, resample};

fn all_selections() -> Vec<Selection> {
    let mut out = vec![];
    for g in [Granularity::Hour, Granularity::Minute] {
        for l in Lookback::ALL {
            out.push(Selection::new(g, l));
        }
    }
    out
}

/// Irregular log spanning the three days before `now` (12:00 on Jan 4th).
fn irregular_log() -> (RawLog, DateTime<Utc>) {
    let now = Utc.with_ymd_and_hms(2024, 1, 4, 12, 0, 0).unwrap();
    let mut entries = vec![];
    let mut t = now - Duration::hours(80);
    let mut n = 0u64;
    while t < now {
        n += 1;
        entries.push((t, n, n / 3));
        t += Duration::seconds(37 * 60 + 11 * (n as i64 % 7));
    }
    (log(&entries), now)
}

/// Brute-force LOCF: latest entry with timestamp <= g.
fn expected_at(log: &RawLog, g: DateTime<Utc>) -> Vec<u64> {
    let mut values = vec![0; log.counters().len()];
    for (i, t) in log.times().iter().enumerate() {
        if *t <= g {
            for (slot, c) in values.iter_mut().zip(log.counters()) {
                *slot = c.value_at(i).unwrap();
            }
        }
    }
    values
}

#[test]
fn grid_length_and_spacing_for_every_selection() {
    let (log, now) = irregular_log();
    for selection in all_selections() {
        let s = resample(&log, selection, now, SamplingMode::PointInTime);
        let expected = (selection.lookback.hours()
            * match selection.granularity {
                Granularity::Hour => 1,
                Granularity::Minute => 60,
            }) as usize;
        assert_eq!(s.len(), expected, "{selection:?}");
        assert_eq!(s.points[0].timestamp, now - selection.lookback.duration());
        for w in s.points.windows(2) {
            assert_eq!(w[1].timestamp - w[0].timestamp, selection.granularity.step());
        }
        assert!(s.points.last().unwrap().timestamp < now);
    }
}

#[test]
fn values_match_latest_entry_at_or_before_grid_point() {
    let (log, now) = irregular_log();
    for selection in all_selections() {
        let s = resample(&log, selection, now, SamplingMode::PointInTime);
        for p in &s.points {
            assert_eq!(p.values, expected_at(&log, p.timestamp), "at {}", p.timestamp);
        }
    }
}

#[test]
fn resample_is_idempotent_with_frozen_now() {
    let (log, now) = irregular_log();
    let selection = Selection::new(Granularity::Minute, Lookback::OneDay);
    for mode in [SamplingMode::PointInTime, SamplingMode::BucketClose] {
        assert_eq!(
            resample(&log, selection, now, mode),
            resample(&log, selection, now, mode)
        );
    }
}

#[test]
fn cursor_never_passes_log_end() {
    let (log, now) = irregular_log();
    for selection in all_selections() {
        let s = resample(&log, selection, now, SamplingMode::BucketClose);
        assert!(s.consumed <= log.len());
    }
    let s = resample(
        &log,
        Selection::new(Granularity::Hour, Lookback::OneHour),
        now + Duration::days(30),
        SamplingMode::PointInTime,
    );
    assert_eq!(s.consumed, log.len());
    let last = last_values(&log);
    assert!(s.points.iter().all(|p| p.values == last));
}

fn last_values(log: &RawLog) -> Vec<u64> {
    let last = log.len() - 1;
    log.counters()
        .iter()
        .map(|c| c.value_at(last).unwrap())
        .collect()
}

#[test]
fn single_entry_after_grid_start_is_not_carried_backwards() {
    let log = log(&[(at(0, 0), 5, 2)]);
    let now = at(0, 30);
    let s = resample(
        &log,
        Selection::new(Granularity::Hour, Lookback::OneHour),
        now,
        SamplingMode::PointInTime,
    );
    assert_eq!(s.len(), 1);
    assert_eq!(
        s.points[0].timestamp,
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap()
    );
    assert_eq!(s.points[0].values, vec![0, 0]);
}

#[test]
fn bucket_close_picks_up_entries_inside_the_bucket() {
    let log = log(&[(at(0, 0), 5, 2)]);
    let s = resample(
        &log,
        Selection::new(Granularity::Hour, Lookback::OneHour),
        at(0, 30),
        SamplingMode::BucketClose,
    );
    assert_eq!(s.len(), 1);
    assert_eq!(s.points[0].values, vec![5, 2]);
}

#[test]
fn empty_log_gives_zero_filled_grid() {
    let s = resample(
        &empty_log(),
        Selection::new(Granularity::Minute, Lookback::FiveHours),
        at(12, 0),
        SamplingMode::PointInTime,
    );
    assert_eq!(s.len(), 300);
    assert!(s.points.iter().all(|p| p.values == vec![0, 0]));
    assert_eq!(s.consumed, 0);
}

#[test]
fn entries_all_before_start_freeze_last_value() {
    let log = log(&[(at(1, 0), 1, 0), (at(2, 0), 4, 1)]);
    let s = resample(
        &log,
        Selection::new(Granularity::Hour, Lookback::FiveHours),
        at(10, 0),
        SamplingMode::PointInTime,
    );
    assert_eq!(s.len(), 5);
    assert!(s.points.iter().all(|p| p.values == vec![4, 1]));
}

#[test]
fn constant_counter_holds_from_grid_start() {
    let log = RawLog::new(
        vec![at(11, 30)],
        vec![
            Counter::series(CounterKind::Connections, vec![9]),
            Counter::constant(CounterKind::Torrents, 3),
        ],
    )
    .unwrap();
    let s = resample(
        &log,
        Selection::new(Granularity::Minute, Lookback::OneHour),
        at(12, 0),
        SamplingMode::PointInTime,
    );
    assert_eq!(s.column(CounterKind::Torrents).unwrap(), vec![3; 60]);
    let connections = s.column(CounterKind::Connections).unwrap();
    assert_eq!(connections[29], 0);
    assert_eq!(connections[30], 9);
    assert_eq!(s.column(CounterKind::Completed), None);
}

#[test]
fn switching_granularity_recomputes_from_scratch() {
    let log = log(&[(at(10, 15), 1, 0), (at(10, 45), 2, 1), (at(11, 20), 3, 1)]);
    let now = at(12, 0);
    let hourly = resample(
        &log,
        Selection::new(Granularity::Hour, Lookback::FiveHours),
        now,
        SamplingMode::PointInTime,
    );
    let minutely = resample(
        &log,
        Selection::new(Granularity::Minute, Lookback::FiveHours),
        now,
        SamplingMode::PointInTime,
    );
    assert_eq!(hourly.len(), 5);
    assert_eq!(minutely.len(), 300);
    assert_eq!(
        hourly.column(CounterKind::Connections).unwrap(),
        vec![0, 0, 0, 0, 2]
    );
    let fine = minutely.column(CounterKind::Connections).unwrap();
    // 07:00 start: 10:15 is index 195, 10:45 is 225, 11:20 is 260.
    assert_eq!(fine[194], 0);
    assert_eq!(fine[195], 1);
    assert_eq!(fine[225], 2);
    assert_eq!(fine[260], 3);
    assert_eq!(fine[299], 3);
}

#[test]
fn unsorted_log_is_not_reordered() {
    // An earlier entry after a later one is still consumed in array order.
    let log = log(&[(at(11, 10), 5, 0), (at(11, 5), 2, 0)]);
    let s = resample(
        &log,
        Selection::new(Granularity::Minute, Lookback::OneHour),
        at(12, 0),
        SamplingMode::PointInTime,
    );
    let c = s.column(CounterKind::Connections).unwrap();
    assert_eq!(c[9], 0);
    assert_eq!(c[10], 2);
    assert!(!log.is_sorted());
}
