//! Top-level facade crate for regdash.
//!
//! Re-exports the domain types and the dashboard server library so users can depend on a single crate.

pub mod core {
    pub use regdash_core::*;
}

pub mod server {
    pub use regdash_server::*;
}
