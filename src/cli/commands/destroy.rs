//! Destroy command - remove one key

use crate::cli::args::DestroyArgs;
use crate::cli::Invocation;
use crate::error::SatchelResult;
use crate::ui::{self, UiContext};

/// Execute the destroy command
pub async fn execute(args: DestroyArgs, inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;

    let removed = store.destroy(&args.key)?;
    inv.finish(scope).await?;

    if removed {
        ui::step_ok(&ctx, &format!("Removed {}", args.key));
    } else {
        ui::step_warn_hint(
            &ctx,
            &format!("{} is still readable", args.key),
            "the legacy nesting policy only removes top-level keys",
        );
    }

    Ok(())
}
