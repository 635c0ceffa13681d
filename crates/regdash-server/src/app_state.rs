//! Shared application state for the regdash server.
//!
//! Every service object (backend, loader, token table, metrics) is built
//! once here and handed down explicitly; there are no ambient singletons.

use std::sync::Arc;

use regdash_core::error::Result;

use crate::auth::{Session, TokenRegistry};
use crate::config::DashboardConfig;
use crate::loader::{Clock, DashboardLoader, LoaderOptions, SystemClock};
use crate::obs::LoaderMetrics;
use crate::source::MemoryBackend;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: DashboardConfig,
    tokens: TokenRegistry,
    backend: Arc<MemoryBackend>,
    loader: DashboardLoader,
    metrics: Arc<LoaderMetrics>,
}

impl AppState {
    /// Build application state with the system wall clock.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: DashboardConfig) -> Result<Self> {
        let clock = Arc::new(SystemClock::new(cfg.loader.utc_offset()?));
        Self::with_clock(cfg, clock)
    }

    pub fn with_clock(cfg: DashboardConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        // 1) Backend (seeded)
        let backend = Arc::new(MemoryBackend::from_config(&cfg)?);

        // 2) Token table
        let tokens = TokenRegistry::from_config(&cfg.auth);
        if tokens.is_empty() {
            tracing::warn!("auth.tokens is empty; dashboard endpoints will reject every request");
        }

        // 3) Loader over the backend
        let metrics = Arc::new(LoaderMetrics::default());
        let loader = DashboardLoader::new(
            backend.clone(),
            backend.clone(),
            clock,
            LoaderOptions::from(&cfg.loader),
            Arc::clone(&metrics),
        );

        tracing::info!(
            seeded = backend.len(),
            tokens = tokens.len(),
            debounce_ms = cfg.loader.debounce_ms,
            "app state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                tokens,
                backend,
                loader,
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &DashboardConfig {
        &self.inner.cfg
    }

    pub fn resolve_session(&self, token: Option<&str>) -> Result<Session> {
        self.inner.tokens.resolve(token)
    }

    pub fn backend(&self) -> &MemoryBackend {
        &self.inner.backend
    }

    pub fn loader(&self) -> &DashboardLoader {
        &self.inner.loader
    }

    pub fn metrics(&self) -> &LoaderMetrics {
        &self.inner.metrics
    }

    /// Extra gauge lines for `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("regdash_registrations_stored", self.inner.backend.len() as u64)]
    }

    /// Teardown: cancel any pending dashboard load.
    pub fn shutdown(&self) {
        self.inner.loader.dispose();
    }
}
