//! UI helpers for consistent CLI output
//!
//! Uses `cliclack` for styled output and prompts in a terminal, with plain
//! output when stdout is piped or running under CI.

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, remark, step_error_detail, step_info, step_ok,
    step_ok_detail, step_warn, step_warn_hint,
};
pub use prompts::confirm;
