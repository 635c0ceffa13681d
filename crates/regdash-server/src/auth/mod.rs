//! Session types shared across layers.
//!
//! Auth state is an explicit `Session` value resolved once per request from a
//! bearer token, instead of ambient context.

pub mod session;

pub use session::{bearer_token, Role, Session, TokenRegistry};
