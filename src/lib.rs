//! Satchel - request-scoped session store
//!
//! A session map keyed by dotted paths, opened once per request, swept by
//! a lifetime check and persisted through a pluggable transport.

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod ui;

pub use error::{SatchelError, SatchelResult};
