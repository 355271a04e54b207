// Dashboard pipeline: event -> store update -> resample -> chart redraw.
// Runs synchronously; the caller serializes events (see worker).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{ChartData, ChartSink, ChartStyle};
use crate::models::{Granularity, Lookback, RawLog, Selection};
use crate::resampler::{SamplingMode, resample};
use crate::store::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum DataState {
    /// First fetch has not completed yet.
    Loading,
    Ready,
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    SnapshotLoaded(RawLog),
    SnapshotUnavailable(String),
    GranularityChanged(Granularity),
    LookbackChanged(Lookback),
}

pub struct Dashboard<S: ChartSink> {
    store: SnapshotStore,
    sink: S,
    style: ChartStyle,
    sampling: SamplingMode,
    state: DataState,
}

impl<S: ChartSink> Dashboard<S> {
    pub fn new(sink: S, selection: Selection, style: ChartStyle, sampling: SamplingMode) -> Self {
        Self {
            store: SnapshotStore::new(selection),
            sink,
            style,
            sampling,
            state: DataState::Loading,
        }
    }

    pub fn state(&self) -> &DataState {
        &self.state
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn selection(&self) -> Selection {
        self.store.selection()
    }

    /// Applies one event to completion. Selection changes redraw only once data is ready.
    pub fn handle(&mut self, event: DashboardEvent, now: DateTime<Utc>) -> &DataState {
        match event {
            DashboardEvent::SnapshotLoaded(log) => {
                if !log.is_sorted() {
                    warn!(
                        entries = log.len(),
                        "snapshot timestamps are not sorted; resampled values may be wrong"
                    );
                }
                info!(
                    entries = log.len(),
                    counters = log.counters().len(),
                    "snapshot loaded"
                );
                self.store.load(log);
                self.state = DataState::Ready;
                self.recompute(now);
            }
            DashboardEvent::SnapshotUnavailable(reason) => {
                warn!(reason = %reason, "snapshot unavailable");
                self.state = DataState::Unavailable(reason);
            }
            DashboardEvent::GranularityChanged(g) => {
                info!(granularity = ?g, "granularity changed");
                self.store.set_granularity(g);
                self.recompute(now);
            }
            DashboardEvent::LookbackChanged(l) => {
                info!(lookback_hours = l.hours(), "lookback changed");
                self.store.set_lookback(l);
                self.recompute(now);
            }
        }
        &self.state
    }

    /// Full resample of the stored log with the current selection, pushed to the sink.
    pub fn recompute(&mut self, now: DateTime<Utc>) -> Option<ChartData> {
        if self.state != DataState::Ready {
            return None;
        }
        let series = resample(
            self.store.raw_log(),
            self.store.selection(),
            now,
            self.sampling,
        );
        let data = ChartData::from_series(&series, &self.style);
        self.sink.redraw(data.clone());
        Some(data)
    }
}
