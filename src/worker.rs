// Dashboard task: owns the Dashboard and applies every command in arrival order.
// The snapshot fetch (startup and reload) is the only await between commands.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};

use crate::chart::{ChartData, ChartStyle, WatchChart};
use crate::dashboard::{Dashboard, DashboardEvent, DataState};
use crate::models::{Granularity, Lookback, RawSnapshot, Selection};
use crate::resampler::SamplingMode;
use crate::source::SnapshotSource;

/// Initial selection and resampling behaviour for the task.
pub struct DashboardConfig {
    pub selection: Selection,
    pub sampling: SamplingMode,
    pub style: ChartStyle,
    pub command_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    pub state: DataState,
    pub selection: Selection,
}

#[derive(Debug)]
pub enum DashboardCommand {
    Select {
        granularity: Option<Granularity>,
        lookback: Option<Lookback>,
        reply: oneshot::Sender<DashboardStatus>,
    },
    Reload {
        reply: oneshot::Sender<DashboardStatus>,
    },
    Status {
        reply: oneshot::Sender<DashboardStatus>,
    },
    RawSnapshot {
        reply: oneshot::Sender<Option<RawSnapshot>>,
    },
}

/// Cloneable front door to the dashboard task.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<DashboardCommand>,
    chart_rx: watch::Receiver<Option<ChartData>>,
}

impl DashboardHandle {
    /// Latest chart pushed by the task (may be stale while `Unavailable`).
    pub fn chart(&self) -> Option<ChartData> {
        self.chart_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ChartData>> {
        self.chart_rx.clone()
    }

    pub async fn status(&self) -> anyhow::Result<DashboardStatus> {
        self.request(|reply| DashboardCommand::Status { reply }).await
    }

    pub async fn select(
        &self,
        granularity: Option<Granularity>,
        lookback: Option<Lookback>,
    ) -> anyhow::Result<DashboardStatus> {
        self.request(|reply| DashboardCommand::Select {
            granularity,
            lookback,
            reply,
        })
        .await
    }

    pub async fn reload(&self) -> anyhow::Result<DashboardStatus> {
        self.request(|reply| DashboardCommand::Reload { reply }).await
    }

    pub async fn raw_snapshot(&self) -> anyhow::Result<Option<RawSnapshot>> {
        self.request(|reply| DashboardCommand::RawSnapshot { reply })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> DashboardCommand,
    ) -> anyhow::Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| anyhow::anyhow!("dashboard task stopped"))?;
        reply_rx
            .await
            .map_err(|_| anyhow::anyhow!("dashboard task dropped the reply"))
    }
}

/// Spawns the dashboard task. It fetches once, then serves commands until shutdown
/// or until every handle is dropped.
pub fn spawn<Src: SnapshotSource>(
    source: Src,
    config: DashboardConfig,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> (DashboardHandle, tokio::task::JoinHandle<()>) {
    let DashboardConfig {
        selection,
        sampling,
        style,
        command_capacity,
    } = config;

    let (tx, mut rx) = mpsc::channel(command_capacity.max(1));
    let (sink, chart_rx) = WatchChart::channel();
    let handle = DashboardHandle { tx, chart_rx };

    let join = tokio::spawn(async move {
        let mut dashboard = Dashboard::new(sink, selection, style, sampling);
        fetch_into(&source, &mut dashboard).await;

        loop {
            tokio::select! {
                cmd = rx.recv() => {
                    match cmd {
                        Some(cmd) => handle_command(&source, &mut dashboard, cmd).await,
                        None => break,
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Dashboard task shutting down");
                    break;
                }
            }
        }
    });

    (handle, join)
}

async fn fetch_into<Src: SnapshotSource>(source: &Src, dashboard: &mut Dashboard<WatchChart>) {
    let event = match source.fetch().await {
        Ok(log) => DashboardEvent::SnapshotLoaded(log),
        Err(e) => {
            tracing::warn!(error = %e, operation = "fetch_snapshot", "snapshot fetch failed");
            DashboardEvent::SnapshotUnavailable(e.to_string())
        }
    };
    dashboard.handle(event, Utc::now());
}

async fn handle_command<Src: SnapshotSource>(
    source: &Src,
    dashboard: &mut Dashboard<WatchChart>,
    cmd: DashboardCommand,
) {
    match cmd {
        DashboardCommand::Select {
            granularity,
            lookback,
            reply,
        } => {
            if let Some(g) = granularity {
                dashboard.handle(DashboardEvent::GranularityChanged(g), Utc::now());
            }
            if let Some(l) = lookback {
                dashboard.handle(DashboardEvent::LookbackChanged(l), Utc::now());
            }
            let _ = reply.send(status(dashboard));
        }
        DashboardCommand::Reload { reply } => {
            fetch_into(source, dashboard).await;
            let _ = reply.send(status(dashboard));
        }
        DashboardCommand::Status { reply } => {
            let _ = reply.send(status(dashboard));
        }
        DashboardCommand::RawSnapshot { reply } => {
            let snapshot = dashboard
                .store()
                .is_loaded()
                .then(|| RawSnapshot::from(dashboard.store().raw_log()));
            let _ = reply.send(snapshot);
        }
    }
}

fn status(dashboard: &Dashboard<WatchChart>) -> DashboardStatus {
    DashboardStatus {
        state: dashboard.state().clone(),
        selection: dashboard.selection(),
    }
}
