//! regdash server library entry.
//!
//! This crate wires config, sessions, backend collaborators, the debounced
//! dashboard loader, and the HTTP API into one service. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod loader;
pub mod obs;
pub mod ops;
pub mod router;
pub mod source;
