//! Gc command - expire or renew the session

use crate::cli::args::GcArgs;
use crate::cli::Invocation;
use crate::error::SatchelResult;
use crate::session::SessionState;
use crate::ui::{self, UiContext};

/// Execute the gc command
pub async fn execute(args: GcArgs, inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let max = args
        .max_lifetime
        .unwrap_or(inv.config.session.max_lifetime_minutes);

    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;
    let id = store.session_id().unwrap_or("-").to_string();

    store.gc(max).await?;
    let state = store.state();
    inv.finish(scope).await?;

    if state == SessionState::Closed {
        ui::step_warn(
            &ctx,
            &format!("Session {} expired (lifetime {} min) and was closed", id, max),
        );
    } else {
        ui::step_ok_detail(&ctx, "Session renewed", &id);
    }
    ui::key_value(&ctx, "state", state.name());

    Ok(())
}
