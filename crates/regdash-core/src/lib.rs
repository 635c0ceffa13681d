//! regdash core: transport-agnostic domain types, date-range resolution, and errors.
//!
//! This crate defines the data contracts shared by the dashboard loader, the
//! registration backends, and the HTTP layer. It carries no runtime or
//! transport dependencies so it can be reused by other frontends.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RegdashError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod range;

/// Shared result type.
pub use error::{Result, RegdashError};
pub use range::{resolve_range, DateRange, RangeKey, Timestamp, UnknownRangePolicy, WeekStart};
