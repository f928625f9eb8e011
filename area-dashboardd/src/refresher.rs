use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use shared::protocol::{GRID_ID, REFRESH_LABEL_ID};
use crate::backend::AreaSource;
use crate::config::Timing;
use crate::error::{DashboardError, Result};
use crate::page::Page;
use crate::render::{self, format::freshness_label};

/// When the last successful refresh completed.
/// Written only by the refresh loop; everyone else holds a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshState {
    pub last_update: Instant,
    pub last_update_at: DateTime<Utc>,
}

impl RefreshState {
    pub fn now() -> Self {
        Self {
            last_update: Instant::now(),
            last_update_at: Utc::now(),
        }
    }
}

/// One fetch-render pass. Returns the number of cards rendered.
///
/// Nothing on the page or in the refresh state changes unless the fetch
/// succeeds.
pub async fn refresh_cycle(
    source: &dyn AreaSource,
    page: &Page,
    state_tx: &watch::Sender<RefreshState>,
    request_timeout: Duration,
) -> Result<usize> {
    let areas = tokio::time::timeout(request_timeout, source.fetch_areas())
        .await
        .map_err(|_| DashboardError::TimedOut { timeout: request_timeout })??;

    match page.element(GRID_ID) {
        Some(grid) => grid.replace(render::render_grid(&areas)?),
        None => {
            let err = DashboardError::MissingMountPoint { id: GRID_ID.to_string() };
            tracing::debug!("Skipping grid update: {}", err);
        }
    }

    state_tx.send_replace(RefreshState::now());
    Ok(areas.len())
}

/// Refresh loop: one cycle immediately, then one per interval until cancelled.
///
/// Cycles never overlap. A fetch that outlives the request timeout is
/// dropped, and cancellation drops an in-flight fetch before it can write.
pub async fn run_refresh(
    source: Arc<dyn AreaSource>,
    page: Page,
    state_tx: watch::Sender<RefreshState>,
    timing: Timing,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(timing.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = refresh_cycle(source.as_ref(), &page, &state_tx, timing.request_timeout) => {
                match result {
                    Ok(count) => tracing::debug!("Rendered {} area cards", count),
                    Err(e) => tracing::warn!(kind = ?e.kind(), "Error fetching areas: {}", e),
                }
            }
        }
    }

    tracing::info!("Refresh loop shutting down");
}

/// Write the freshness label for the given state, if the label exists.
pub fn update_refresh_label(page: &Page, state: &RefreshState) {
    if let Some(label) = page.element(REFRESH_LABEL_ID) {
        let elapsed = Instant::now().saturating_duration_since(state.last_update);
        label.replace(format!("Last updated: {}", freshness_label(elapsed)));
    }
}

/// Freshness label loop. Ticks on its own timer and also redraws as soon
/// as a refresh succeeds.
pub async fn run_freshness_label(
    page: Page,
    mut state_rx: watch::Receiver<RefreshState>,
    tick: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut state_open = true;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = state_rx.changed(), if state_open => {
                // Sender gone means the refresh loop stopped; keep ticking.
                if changed.is_err() {
                    state_open = false;
                    continue;
                }
            }
            _ = interval.tick() => {}
        }

        let state = *state_rx.borrow_and_update();
        update_refresh_label(&page, &state);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use async_trait::async_trait;
    use shared::types::{AreaId, AreaRecord};
    use crate::error::FailureKind;

    use super::*;

    /// What a scripted fetch does.
    #[derive(Clone)]
    pub enum Step {
        Areas(Vec<AreaRecord>),
        Fail,
        /// Sleep, then return the areas
        Slow(Duration, Vec<AreaRecord>),
    }

    /// Plays back a fixed script; the last step repeats forever.
    pub struct ScriptedSource {
        steps: Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AreaSource for ScriptedSource {
        async fn fetch_areas(&self) -> Result<Vec<AreaRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let step = {
                let mut steps = self.steps.lock().unwrap();
                if steps.len() > 1 {
                    steps.pop_front()
                } else {
                    steps.front().cloned()
                }
            };

            match step {
                Some(Step::Areas(areas)) => Ok(areas),
                Some(Step::Slow(delay, areas)) => {
                    tokio::time::sleep(delay).await;
                    Ok(areas)
                }
                Some(Step::Fail) | None => Err(malformed()),
            }
        }
    }

    pub fn malformed() -> DashboardError {
        DashboardError::Malformed {
            url: "http://backend/areas".to_string(),
            source: serde_json::from_str::<Vec<AreaRecord>>("not json").unwrap_err(),
        }
    }

    pub fn area(id: i64, name: &str, status: &str, people_count: u32) -> AreaRecord {
        AreaRecord {
            id: Some(AreaId::Number(id)),
            name: name.to_string(),
            status: status.to_string(),
            people_count,
            time_ago: "2 minutes ago".to_string(),
            is_outdated: false,
        }
    }

    fn state_channel() -> (watch::Sender<RefreshState>, watch::Receiver<RefreshState>) {
        watch::channel(RefreshState::now())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_success_renders_and_records() {
        let source = ScriptedSource::new(vec![Step::Areas(vec![area(1, "Lab A", "busy", 12)])]);
        let page = Page::standard();
        let (state_tx, state_rx) = state_channel();
        let before = *state_rx.borrow();

        tokio::time::advance(Duration::from_secs(3)).await;
        let count = refresh_cycle(&source, &page, &state_tx, Duration::from_secs(8))
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert!(page.contents(GRID_ID).contains("Lab A"));
        assert!(state_rx.borrow().last_update > before.last_update);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_failure_leaves_page_and_state() {
        let source = ScriptedSource::new(vec![Step::Fail]);
        let page = Page::standard();
        page.element(GRID_ID).unwrap().replace("previous".to_string());
        let (state_tx, state_rx) = state_channel();
        let before = *state_rx.borrow();

        tokio::time::advance(Duration::from_secs(3)).await;
        let err = refresh_cycle(&source, &page, &state_tx, Duration::from_secs(8))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Protocol);
        assert_eq!(page.contents(GRID_ID), "previous");
        assert_eq!(*state_rx.borrow(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_times_out() {
        let source = ScriptedSource::new(vec![Step::Slow(
            Duration::from_secs(60),
            vec![area(1, "Lab A", "busy", 12)],
        )]);
        let page = Page::standard();
        let (state_tx, _state_rx) = state_channel();

        let err = refresh_cycle(&source, &page, &state_tx, Duration::from_secs(8))
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::TimedOut { .. }));
        assert_eq!(err.kind(), FailureKind::Network);
        assert_eq!(page.contents(GRID_ID), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_without_grid_still_records() {
        let source = ScriptedSource::new(vec![Step::Areas(vec![area(1, "Lab A", "busy", 12)])]);
        let page = Page::with_mounts([REFRESH_LABEL_ID]);
        let (state_tx, state_rx) = state_channel();
        let before = *state_rx.borrow();

        tokio::time::advance(Duration::from_secs(1)).await;
        let count = refresh_cycle(&source, &page, &state_tx, Duration::from_secs(8))
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert!(state_rx.borrow().last_update > before.last_update);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_label_text() {
        let page = Page::standard();
        let state = RefreshState::now();

        update_refresh_label(&page, &state);
        assert_eq!(page.contents(REFRESH_LABEL_ID), "Last updated: Just now");

        tokio::time::advance(Duration::from_secs(5)).await;
        update_refresh_label(&page, &state);
        assert_eq!(page.contents(REFRESH_LABEL_ID), "Last updated: Just now");

        tokio::time::advance(Duration::from_secs(1)).await;
        update_refresh_label(&page, &state);
        assert_eq!(page.contents(REFRESH_LABEL_ID), "Last updated: 6 seconds ago");
    }

    #[tokio::test]
    async fn test_refresh_label_missing_mount_is_noop() {
        let page = Page::with_mounts([GRID_ID]);
        update_refresh_label(&page, &RefreshState::now());
        assert_eq!(page.contents(GRID_ID), "");
    }
}
