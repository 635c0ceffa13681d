//! Dashboard data loading.
//!
//! `DashboardLoader` turns `(range, page, limit)` requests into a pair of
//! concurrent collaborator fetches, with debounce + in-flight de-duplication,
//! and publishes the results as `DashboardState`.

mod clock;
mod debounced;

pub use clock::{Clock, FixedClock, SystemClock};
pub use debounced::{DashboardLoader, LoaderOptions, LOAD_FAILED_MSG};
