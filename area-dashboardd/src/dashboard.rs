use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::backend::AreaSource;
use crate::config::Timing;
use crate::page::Page;
use crate::refresher::{self, RefreshState};

/// How the host page signals that the dashboard may start.
pub enum Readiness {
    /// Already loaded, start right away
    #[cfg_attr(not(test), allow(dead_code))]
    Loaded,
    /// Start once the load notification fires
    Loading(oneshot::Receiver<()>),
}

/// A running dashboard. Dropping it does not stop the timers; call
/// [`DashboardHandle::teardown`].
pub struct DashboardHandle {
    cancel: CancellationToken,
    refresh_task: JoinHandle<()>,
    label_task: JoinHandle<()>,
    state_rx: watch::Receiver<RefreshState>,
}

impl DashboardHandle {
    /// Receiver for the last successful refresh time.
    pub fn refresh_state(&self) -> watch::Receiver<RefreshState> {
        self.state_rx.clone()
    }

    /// Stop both timers and abandon any in-flight fetch.
    pub async fn teardown(self) {
        self.cancel.cancel();

        if let Err(e) = self.refresh_task.await {
            tracing::error!("Refresh task failed: {}", e);
        }
        if let Err(e) = self.label_task.await {
            tracing::error!("Freshness label task failed: {}", e);
        }

        tracing::info!("Dashboard torn down");
    }
}

/// Spawn the refresh loop and the freshness label against `page`.
pub fn start(source: Arc<dyn AreaSource>, page: Page, timing: Timing) -> DashboardHandle {
    let cancel = CancellationToken::new();
    let (state_tx, state_rx) = watch::channel(RefreshState::now());

    let refresh_task = tokio::spawn(refresher::run_refresh(
        source,
        page.clone(),
        state_tx,
        timing,
        cancel.clone(),
    ));

    let label_task = tokio::spawn(refresher::run_freshness_label(
        page,
        state_rx.clone(),
        timing.label_tick,
        cancel.clone(),
    ));

    tracing::info!("Dashboard started, refreshing every {:?}", timing.interval);

    DashboardHandle {
        cancel,
        refresh_task,
        label_task,
        state_rx,
    }
}

/// Start once the page is ready. Both readiness paths end in [`start`].
/// Returns `None` if the page went away before it finished loading.
pub async fn start_when_ready(
    readiness: Readiness,
    source: Arc<dyn AreaSource>,
    page: Page,
    timing: Timing,
) -> Option<DashboardHandle> {
    match readiness {
        Readiness::Loaded => {}
        Readiness::Loading(loaded) => {
            if loaded.await.is_err() {
                tracing::info!("Page closed before load completed, not starting");
                return None;
            }
        }
    }

    Some(start(source, page, timing))
}
