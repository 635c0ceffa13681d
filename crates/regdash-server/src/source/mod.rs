//! Backend collaborators for the dashboard.
//!
//! The loader only sees the `MetricsSource` / `RegistrationsSource` traits;
//! `MemoryBackend` implements both for local runs and tests.

pub mod collaborator;
pub mod memory;

pub use collaborator::{MetricsSource, RegistrationsSource};
pub use memory::MemoryBackend;
