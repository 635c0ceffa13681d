//! Domain models.
//!
//! - Registration: records produced by the multistep registration form.
//! - Dashboard: request keys, aggregate snapshots, and pages published to the
//!   admin dashboard.

pub mod dashboard;
pub mod registration;

pub use dashboard::{DashboardState, MetricsSnapshot, RegistrationsPage, RegistrationsQuery, RequestKey};
pub use registration::{NewRegistration, Registration, RegistrationStatus};
