//! Close command - end the session

use crate::cli::Invocation;
use crate::error::SatchelResult;
use crate::ui::{self, UiContext};

/// Execute the close command
pub async fn execute(inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;

    let id = store.session_id().unwrap_or("-").to_string();
    let emptied = store.close().await?;
    inv.finish(scope).await?;

    if emptied {
        ui::step_ok_detail(&ctx, "Session closed", &id);
    } else {
        ui::step_warn(&ctx, &format!("Session {} closed but data remained", id));
    }

    Ok(())
}
