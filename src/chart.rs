// Chart adapter: line-chart payload built from a resampled series, and the sinks that receive it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::{CounterKind, ResampledSeries};

/// Anything that can redraw the whole chart from a fresh payload.
pub trait ChartSink {
    fn redraw(&mut self, data: ChartData);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub border_color: String,
    pub background_color: String,
    pub data: Vec<u64>,
}

/// Shared x-axis plus one dataset per counter, each aligned to `labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<DateTime<Utc>>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn from_series(series: &ResampledSeries, style: &ChartStyle) -> Self {
        let labels = series.timestamps();
        let datasets = series
            .kinds
            .iter()
            .enumerate()
            .map(|(idx, kind)| {
                let s = style.for_kind(*kind);
                Dataset {
                    label: s.label.clone(),
                    border_color: s.border_color.clone(),
                    background_color: s.background_color.clone(),
                    data: series.points.iter().map(|p| p.values[idx]).collect(),
                }
            })
            .collect();
        Self { labels, datasets }
    }

    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStyle {
    pub label: String,
    pub border_color: String,
    pub background_color: String,
}

impl DatasetStyle {
    fn rgb(label: &str, r: u8, g: u8, b: u8) -> Self {
        Self {
            label: label.to_string(),
            border_color: format!("rgba({r},{g},{b},1)"),
            background_color: format!("rgba({r},{g},{b},0.3)"),
        }
    }
}

/// Dataset label and colours per counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    pub connections: DatasetStyle,
    pub completed: DatasetStyle,
    pub torrents: DatasetStyle,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            connections: DatasetStyle::rgb("Active connections", 0, 0, 255),
            completed: DatasetStyle::rgb("Completed connections", 255, 0, 0),
            torrents: DatasetStyle::rgb("Torrents", 0, 255, 0),
        }
    }
}

impl ChartStyle {
    pub fn for_kind(&self, kind: CounterKind) -> &DatasetStyle {
        match kind {
            CounterKind::Connections => &self.connections,
            CounterKind::Completed => &self.completed,
            CounterKind::Torrents => &self.torrents,
        }
    }
}

/// Publishes every redraw into a watch channel; readers always see the latest chart.
pub struct WatchChart {
    tx: watch::Sender<Option<ChartData>>,
}

impl WatchChart {
    pub fn channel() -> (Self, watch::Receiver<Option<ChartData>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ChartData>> {
        self.tx.subscribe()
    }
}

impl ChartSink for WatchChart {
    fn redraw(&mut self, data: ChartData) {
        self.tx.send_replace(Some(data));
    }
}

/// Keeps every frame it was handed.
#[derive(Debug, Default)]
pub struct RecordingChart {
    pub frames: Vec<ChartData>,
}

impl RecordingChart {
    pub fn last(&self) -> Option<&ChartData> {
        self.frames.last()
    }
}

impl ChartSink for RecordingChart {
    fn redraw(&mut self, data: ChartData) {
        self.frames.push(data);
    }
}
