use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::join;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use regdash_core::error::Result;
use regdash_core::model::{DashboardState, RegistrationsQuery, RequestKey};
use regdash_core::{resolve_range, DateRange, RangeKey, UnknownRangePolicy, WeekStart};

use crate::config::LoaderSection;
use crate::loader::Clock;
use crate::obs::LoaderMetrics;
use crate::source::{MetricsSource, RegistrationsSource};

/// Error published when either fetch fails. The two sources are not told apart.
pub const LOAD_FAILED_MSG: &str = "Failed to load dashboard data";

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Quiescence interval between the last `load` call and the fetch.
    pub debounce: Duration,
    pub default_page: u32,
    pub default_limit: u32,
    pub week_start: WeekStart,
    pub unknown_range: UnknownRangePolicy,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            default_page: 1,
            default_limit: 10,
            week_start: WeekStart::Monday,
            unknown_range: UnknownRangePolicy::Fallback,
        }
    }
}

impl From<&LoaderSection> for LoaderOptions {
    fn from(s: &LoaderSection) -> Self {
        Self {
            debounce: Duration::from_millis(s.debounce_ms),
            default_page: s.default_page,
            default_limit: s.default_limit,
            week_start: s.week_start,
            unknown_range: s.unknown_range,
        }
    }
}

/// Debounced, de-duplicated dashboard loader.
///
/// `load` is fire-and-forget: it never fails, and outcomes are only visible
/// through `snapshot()` / `subscribe()`. Must be used inside a tokio runtime.
///
/// Concurrency:
/// - A call whose request key is already in flight is dropped.
/// - Any other call cancels the pending debounce timer and arms a new one.
/// - Fetches that already started are never cancelled; loads with different
///   keys may overlap and the last one to finish wins.
///
/// Dropping the loader (or calling `dispose`) cancels the pending timer.
pub struct DashboardLoader {
    inner: Arc<LoaderInner>,
}

struct LoaderInner {
    metrics_src: Arc<dyn MetricsSource>,
    registrations_src: Arc<dyn RegistrationsSource>,
    clock: Arc<dyn Clock>,
    opts: LoaderOptions,
    state: watch::Sender<DashboardState>,
    in_flight: Mutex<Option<RequestKey>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
    metrics: Arc<LoaderMetrics>,
}

impl DashboardLoader {
    pub fn new(
        metrics_src: Arc<dyn MetricsSource>,
        registrations_src: Arc<dyn RegistrationsSource>,
        clock: Arc<dyn Clock>,
        opts: LoaderOptions,
        metrics: Arc<LoaderMetrics>,
    ) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            inner: Arc::new(LoaderInner {
                metrics_src,
                registrations_src,
                clock,
                opts,
                state,
                in_flight: Mutex::new(None),
                pending: Mutex::new(None),
                disposed: AtomicBool::new(false),
                metrics,
            }),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.inner.opts
    }

    /// Request a load of `range` (symbolic key), page `page` of size `limit`.
    pub fn load(&self, range: &str, page: u32, limit: u32) {
        let inner = &self.inner;
        if inner.disposed.load(Ordering::Acquire) {
            tracing::debug!(range, page, limit, "loader disposed, ignoring load");
            return;
        }

        let key = RequestKey::new(range, page, limit);
        if inner.is_in_flight(&key) {
            tracing::debug!(request = %key, "load already in flight, skipping");
            inner.metrics.loads_deduplicated.inc(&[]);
            return;
        }

        let range_key = match inner.opts.unknown_range.parse(range) {
            Ok(k) => k,
            Err(e) => {
                tracing::warn!(request = %key, error = %e, "rejected date range");
                inner.supersede(&mut inner.lock_pending());
                inner.state.send_modify(|s| s.error = Some(e.to_string()));
                return;
            }
        };
        inner
            .metrics
            .loads_requested
            .inc(&[("range", range_key.as_str())]);

        let task_inner = Arc::clone(inner);
        let debounce = inner.opts.debounce;
        let timer = async move {
            tokio::time::sleep(debounce).await;
            if task_inner.disposed.load(Ordering::Acquire) {
                return;
            }
            // Detach the fetch so re-arming the timer cannot abort it.
            tokio::spawn(task_inner.run(range_key, page, limit, key));
        };

        let mut pending = inner.lock_pending();
        inner.supersede(&mut pending);
        *pending = Some(tokio::spawn(timer));
    }

    /// `load` with default pagination.
    pub fn refresh(&self, range: &str, page: Option<u32>, limit: Option<u32>) {
        self.load(
            range,
            page.unwrap_or(self.inner.opts.default_page),
            limit.unwrap_or(self.inner.opts.default_limit),
        );
    }

    /// Resolve `range` against the loader's clock.
    pub fn date_range_filter(&self, range: &str) -> Result<DateRange> {
        let key = self.inner.opts.unknown_range.parse(range)?;
        Ok(self.inner.resolve(key))
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    /// Request key of the load currently fetching, if any.
    pub fn in_flight(&self) -> Option<RequestKey> {
        self.inner.lock_in_flight().clone()
    }

    /// Whether a debounce timer is armed and has not fired yet.
    pub fn has_pending(&self) -> bool {
        self.inner
            .lock_pending()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Cancel the pending timer and ignore further loads. In-flight fetches
    /// run to completion.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(h) = self.inner.lock_pending().take() {
            h.abort();
        }
        tracing::debug!("dashboard loader disposed");
    }
}

impl Drop for DashboardLoader {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl LoaderInner {
    fn lock_in_flight(&self) -> MutexGuard<'_, Option<RequestKey>> {
        self.in_flight.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Abort the armed timer, if it has not fired yet.
    fn supersede(&self, pending: &mut Option<JoinHandle<()>>) {
        if let Some(prev) = pending.take() {
            if !prev.is_finished() {
                prev.abort();
                self.metrics.loads_superseded.inc(&[]);
            }
        }
    }

    fn is_in_flight(&self, key: &RequestKey) -> bool {
        self.lock_in_flight().as_ref() == Some(key)
    }

    fn resolve(&self, key: RangeKey) -> DateRange {
        resolve_range(key, self.clock.now(), self.opts.week_start)
    }

    async fn run(self: Arc<Self>, range_key: RangeKey, page: u32, limit: u32, key: RequestKey) {
        let date_range = self.resolve(range_key);

        *self.lock_in_flight() = Some(key.clone());
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        self.metrics.loads_in_flight.inc(&[]);
        let mut guard = InFlightGuard {
            inner: &self,
            key: &key,
            finished: false,
        };
        let started = Instant::now();

        tracing::debug!(request = %key, start = %date_range.start, end = %date_range.end, "loading dashboard data");

        let query = RegistrationsQuery {
            page,
            limit,
            date_range,
        };
        let (metrics_res, registrations_res) = join(
            self.metrics_src.dashboard_metrics(date_range),
            self.registrations_src.registrations(query),
        )
        .await;

        let mut failed = false;
        let metrics = match metrics_res {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(request = %key, source = "metrics", error = %e, "dashboard fetch failed");
                self.metrics.fetch_failures.inc(&[("source", "metrics")]);
                failed = true;
                None
            }
        };
        let registrations = match registrations_res {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(request = %key, source = "registrations", error = %e, "dashboard fetch failed");
                self.metrics.fetch_failures.inc(&[("source", "registrations")]);
                failed = true;
                None
            }
        };

        self.state.send_modify(|s| {
            if let Some(m) = metrics {
                s.metrics = Some(m);
            }
            if let Some(p) = registrations {
                s.registrations = Some(p);
            }
            s.error = failed.then(|| LOAD_FAILED_MSG.to_string());
            s.loading = false;
        });
        guard.finished = true;
        drop(guard);

        let outcome = if failed { "error" } else { "ok" };
        self.metrics.loads_completed.inc(&[("outcome", outcome)]);
        self.metrics
            .load_duration
            .observe(&[("range", range_key.as_str())], started.elapsed());
        tracing::info!(request = %key, outcome, elapsed_ms = started.elapsed().as_millis() as u64, "dashboard load finished");
    }
}

/// Releases the in-flight key when a fetch ends, including when a collaborator
/// panics and the task unwinds.
struct InFlightGuard<'a> {
    inner: &'a LoaderInner,
    key: &'a RequestKey,
    finished: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::error!(request = %self.key, "dashboard load aborted");
            self.inner.state.send_modify(|s| {
                s.error = Some(LOAD_FAILED_MSG.to_string());
                s.loading = false;
            });
            self.inner.metrics.loads_completed.inc(&[("outcome", "aborted")]);
        }
        self.inner.metrics.loads_in_flight.dec(&[]);

        let mut g = self.inner.lock_in_flight();
        if g.as_ref() == Some(self.key) {
            *g = None;
        }
    }
}
