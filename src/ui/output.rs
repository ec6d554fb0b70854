//! Output functions for consistent CLI formatting

use super::context::UiContext;
use console::{style, Style};

/// Severity of a step line
#[derive(Debug, Clone, Copy)]
enum Level {
    Ok,
    Info,
    Warn,
    Error,
}

impl Level {
    fn prefix(self) -> console::StyledObject<&'static str> {
        match self {
            Level::Ok => style("[OK]").green(),
            Level::Info => style("[INFO]").cyan(),
            Level::Warn => style("[WARN]").yellow(),
            Level::Error => style("[FAIL]").red(),
        }
    }
}

fn emit(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        let _ = match level {
            Level::Ok => cliclack::log::success(message),
            Level::Info => cliclack::log::info(message),
            Level::Warn => cliclack::log::warning(message),
            Level::Error => cliclack::log::error(message),
        };
    } else {
        println!("  {} {}", level.prefix(), message);
    }
}

/// Display intro banner
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
        println!();
    }
}

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Ok, message);
}

/// Display a success step with detail
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    emit(ctx, Level::Ok, &format!("{} ({})", message, style(detail).dim()));
}

/// Display an info step
pub fn step_info(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Info, message);
}

/// Display a warning step
pub fn step_warn(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Warn, message);
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    emit(ctx, Level::Warn, &format!("{} - {}", message, style(hint).dim()));
}

/// Display an error step with detail
pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    emit(ctx, Level::Error, &format!("{}: {}", message, style(detail).red()));
}

/// Display a remark/hint
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}

/// Print styled key-value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Print key-value with a good/attention color
pub fn key_value_status(ctx: &UiContext, key: &str, value: &str, ok: bool) {
    if ctx.use_fancy_output() {
        let value_style = if ok {
            Style::new().green()
        } else {
            Style::new().yellow()
        };
        println!("  {}: {}", style(key).dim(), value_style.apply_to(value));
    } else {
        let level = if ok { Level::Ok } else { Level::Warn };
        println!("  {} {}: {}", level.prefix(), key, value);
    }
}
