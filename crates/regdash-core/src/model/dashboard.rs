//! Dashboard data contracts.
//!
//! `MetricsSnapshot` and `RegistrationsPage` are produced by the backend for a
//! given `DateRange` and replaced wholesale on every successful load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::registration::Registration;
use crate::range::DateRange;

/// De-duplication key for a load: `range|page|limit`.
///
/// Built from the raw range key the caller passed, so an unknown key that
/// falls back to `last7Days` still gets its own key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn new(range: &str, page: u32, limit: u32) -> Self {
        Self(format!("{range}|{page}|{limit}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate metrics for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub range: DateRange,
    /// All registrations ever recorded, regardless of window.
    pub total_registrations: u64,
    /// Registrations created inside the window.
    pub new_registrations: u64,
    pub completed: u64,
    pub in_progress: u64,
    /// `completed / new_registrations`, 0 for an empty window.
    pub completion_rate: f64,
}

/// Paging + window filter for the registrations collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationsQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub date_range: DateRange,
}

impl RegistrationsQuery {
    /// Number of items to skip.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationsPage {
    pub items: Vec<Registration>,
    /// Items in the window across all pages.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Observable fields published by the dashboard loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub metrics: Option<MetricsSnapshot>,
    pub registrations: Option<RegistrationsPage>,
    pub loading: bool,
    pub error: Option<String>,
}
