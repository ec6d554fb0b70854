//! Command-line interface

pub mod args;
pub mod commands;
mod cookie;
mod invocation;

pub use args::{Cli, Commands};
pub use cookie::CookieJar;
pub use invocation::Invocation;
