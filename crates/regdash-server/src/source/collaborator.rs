use async_trait::async_trait;

use regdash_core::error::Result;
use regdash_core::model::{MetricsSnapshot, RegistrationsPage, RegistrationsQuery};
use regdash_core::DateRange;

/// Aggregate metrics collaborator. May fail; the loader reports failures as
/// published error state.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn dashboard_metrics(&self, range: DateRange) -> Result<MetricsSnapshot>;
}

/// Paginated registrations collaborator.
#[async_trait]
pub trait RegistrationsSource: Send + Sync {
    async fn registrations(&self, query: RegistrationsQuery) -> Result<RegistrationsPage>;
}
