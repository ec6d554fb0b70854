//! Open command - start or resume the session

use crate::cli::Invocation;
use crate::error::SatchelResult;
use crate::ui::{self, UiContext};

/// Execute the open command
pub async fn execute(inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;

    let started = store
        .started_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());
    let transport = store.transport_name();

    let id = inv.finish(scope).await?.unwrap_or_default();

    ui::step_ok_detail(&ctx, "Session open", transport);
    ui::key_value(&ctx, "id", &id);
    ui::key_value(&ctx, "started", &started);

    Ok(())
}
