//! KpiPoller: periodic refresh of real-time plant KPIs
//!
//! Runs in a background tokio task. Each tick fetches `getStationRealKpi` for
//! every known plant and overwrites the previous snapshot. Failures are
//! recorded as a user-facing message; there are no retries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use super::{DashboardError, DashboardTotals, RelayClient, SessionState};
use crate::models::{Plant, TelemetrySnapshot};

/// Everything the dashboard view shows
#[derive(Debug, Default)]
pub struct DashboardState {
    pub session: SessionState,
    pub plants: Vec<Plant>,
    pub snapshot: Vec<TelemetrySnapshot>,
    pub totals: DashboardTotals,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn set_plants(&mut self, plants: Vec<Plant>) {
        self.plants = plants;
        self.totals = DashboardTotals::compute(&self.plants, &self.snapshot);
    }

    pub fn plant_codes(&self) -> Vec<String> {
        self.plants.iter().map(|p| p.code.clone()).collect()
    }

    /// Replace the previous snapshot; no history is kept
    pub fn apply_snapshot(&mut self, snapshot: Vec<TelemetrySnapshot>) {
        self.snapshot = snapshot;
        self.totals = DashboardTotals::compute(&self.plants, &self.snapshot);
        self.last_updated = Some(Utc::now());
        self.last_error = None;
    }

    pub fn record_error(&mut self, error: &DashboardError) {
        self.last_error = Some(error.user_message());
    }

    /// Logout: drop the token and everything fetched with it
    pub fn clear(&mut self) -> Option<super::Session> {
        let session = self.session.logout();
        *self = Self::default();
        session
    }
}

const MIN_INTERVAL: Duration = Duration::from_secs(1);

pub struct KpiPoller {
    client: Arc<RelayClient>,
    state: Arc<RwLock<DashboardState>>,
    interval: Duration,
}

impl KpiPoller {
    pub fn new(client: Arc<RelayClient>, state: Arc<RwLock<DashboardState>>, interval: Duration) -> Self {
        // tokio's interval panics on a zero period
        Self {
            client,
            state,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Start the refresh loop. The first poll runs immediately.
    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (updates_tx, updates_rx) = watch::channel(0u64);

        tracing::info!(
            "[KpiPoller] Starting KPI refresh (interval: {}s)",
            self.interval.as_secs()
        );

        let task = tokio::spawn(async move {
            let mut timer = time::interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut polls = 0u64;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = timer.tick() => {
                        if let Err(e) = self.poll_once().await {
                            tracing::warn!("[KpiPoller] Refresh failed: {}", e);
                        }
                        polls += 1;
                        let _ = updates_tx.send(polls);
                    }
                }
            }

            tracing::info!("[KpiPoller] Stopped after {} polls", polls);
        });

        PollerHandle {
            stop_tx: Some(stop_tx),
            updates: updates_rx,
            task,
        }
    }

    /// One refresh: guard on the session, fetch, overwrite or record the error
    pub async fn poll_once(&self) -> Result<(), DashboardError> {
        let fetched = {
            let state = self.state.read().await;
            state
                .session
                .require()
                .map(|session| (session.clone(), state.plant_codes()))
        };

        let result = match fetched {
            Ok((session, codes)) => self.client.fetch_kpis(&session, &codes).await,
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        match result {
            Ok(snapshot) => {
                tracing::debug!("[KpiPoller] Refreshed {} plants", snapshot.len());
                state.apply_snapshot(snapshot);
                Ok(())
            }
            Err(e) => {
                state.record_error(&e);
                Err(e)
            }
        }
    }
}

/// Owner of the running poll task
pub struct PollerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    updates: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Receiver that changes after every completed poll
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.clone()
    }

    /// Stop the timer and wait for an in-flight poll to finish
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!("[KpiPoller] Task ended abnormally: {}", e);
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
