//! Confirmation prompt with non-interactive fallback

use super::context::UiContext;
use crate::error::{SatchelError, SatchelResult};

/// Ask for confirmation; auto-yes answers `true`, non-interactive answers `default`
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> SatchelResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on stdin
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| SatchelError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| SatchelError::User(format!("Prompt failed: {}", e)))
}
