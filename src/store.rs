// Snapshot store: last loaded raw log plus the current granularity/lookback selection.

use crate::models::{Granularity, Lookback, RawLog, Selection};

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    raw_log: RawLog,
    selection: Selection,
    loaded: bool,
}

impl SnapshotStore {
    pub fn new(selection: Selection) -> Self {
        Self {
            raw_log: RawLog::default(),
            selection,
            loaded: false,
        }
    }

    /// Replaces the stored log wholesale.
    pub fn load(&mut self, raw_log: RawLog) {
        self.raw_log = raw_log;
        self.loaded = true;
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.selection.granularity = granularity;
    }

    pub fn set_lookback(&mut self, lookback: Lookback) {
        self.selection.lookback = lookback;
    }

    pub fn raw_log(&self) -> &RawLog {
        &self.raw_log
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
