use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use regdash_core::error::{RegdashError, Result};
use regdash_core::model::{
    MetricsSnapshot, NewRegistration, Registration, RegistrationStatus, RegistrationsPage,
    RegistrationsQuery,
};
use regdash_core::DateRange;

use crate::config::DashboardConfig;
use crate::source::{MetricsSource, RegistrationsSource};

/// In-memory registration store: `id -> Registration`.
///
/// Stands in for the hosted table storage. Nothing is persisted.
pub struct MemoryBackend {
    rows: DashMap<u64, Registration>,
    next_id: AtomicU64,
    total_steps: u32,
    max_page_limit: u32,
}

impl MemoryBackend {
    pub fn new(total_steps: u32, max_page_limit: u32) -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicU64::new(1),
            total_steps: total_steps.max(1),
            max_page_limit: max_page_limit.max(1),
        }
    }

    /// Build from config, inserting `seed` rows.
    pub fn from_config(cfg: &DashboardConfig) -> Result<Self> {
        let backend = Self::new(cfg.form.total_steps, cfg.loader.max_page_limit);
        for row in &cfg.seed {
            backend.seed(row.clone())?;
        }
        Ok(backend)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Store a form submission, stamped with the current time.
    pub fn submit(&self, new: NewRegistration) -> Result<Registration> {
        self.insert(new, Utc::now())
    }

    /// Store a row keeping its `created_at` when present.
    pub fn seed(&self, new: NewRegistration) -> Result<Registration> {
        let created_at = new.created_at.unwrap_or_else(Utc::now);
        self.insert(new, created_at)
    }

    fn insert(&self, new: NewRegistration, created_at: DateTime<Utc>) -> Result<Registration> {
        new.validate(self.total_steps)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = Registration {
            id,
            full_name: new.full_name.trim().to_string(),
            email: new.email.trim().to_lowercase(),
            status: RegistrationStatus::for_step(new.current_step, self.total_steps),
            current_step: new.current_step,
            created_at,
            answers: new.answers,
        };
        self.rows.insert(id, row.clone());
        tracing::debug!(id, status = ?row.status, "registration stored");
        Ok(row)
    }

    fn in_range(&self, range: &DateRange) -> Vec<Registration> {
        self.rows
            .iter()
            .filter(|r| range.contains(&r.value().created_at))
            .map(|r| r.value().clone())
            .collect()
    }
}

#[async_trait]
impl MetricsSource for MemoryBackend {
    async fn dashboard_metrics(&self, range: DateRange) -> Result<MetricsSnapshot> {
        let rows = self.in_range(&range);
        let new_registrations = rows.len() as u64;
        let completed = rows
            .iter()
            .filter(|r| r.status == RegistrationStatus::Completed)
            .count() as u64;

        let completion_rate = if new_registrations == 0 {
            0.0
        } else {
            completed as f64 / new_registrations as f64
        };

        Ok(MetricsSnapshot {
            range,
            total_registrations: self.rows.len() as u64,
            new_registrations,
            completed,
            in_progress: new_registrations - completed,
            completion_rate,
        })
    }
}

#[async_trait]
impl RegistrationsSource for MemoryBackend {
    async fn registrations(&self, query: RegistrationsQuery) -> Result<RegistrationsPage> {
        if query.page == 0 {
            return Err(RegdashError::BadRequest("page must be at least 1".into()));
        }
        if query.limit == 0 || query.limit > self.max_page_limit {
            return Err(RegdashError::BadRequest(format!(
                "limit must be between 1 and {}",
                self.max_page_limit
            )));
        }

        let mut rows = self.in_range(&query.date_range);
        // Newest first; id breaks ties between identical timestamps.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(query.offset())
            .take(query.limit as usize)
            .collect();

        Ok(RegistrationsPage {
            items,
            total,
            page: query.page,
            limit: query.limit,
        })
    }
}
