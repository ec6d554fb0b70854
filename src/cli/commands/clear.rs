//! Clear command - remove every key

use crate::cli::args::ClearArgs;
use crate::cli::Invocation;
use crate::error::SatchelResult;
use crate::ui::{self, UiContext};

/// Execute the clear command
pub async fn execute(args: ClearArgs, inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);

    if !ui::confirm(&ctx, "Remove every key from the session?", false).await? {
        ui::step_info(&ctx, "Nothing removed (pass --yes to skip the prompt)");
        return Ok(());
    }

    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;
    let count = store.debug().len();
    store.clear();
    inv.finish(scope).await?;

    ui::step_ok(&ctx, &format!("Removed {} key(s)", count));
    Ok(())
}
