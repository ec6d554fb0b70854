//! Read command - print one value

use crate::cli::args::{ReadArgs, ValueFormat};
use crate::cli::Invocation;
use crate::error::{SatchelError, SatchelResult};

/// Execute the read command
///
/// Prints only the value so the output can be captured by scripts.
pub async fn execute(args: ReadArgs, inv: &Invocation) -> SatchelResult<()> {
    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;
    let value = store.read(&args.key).cloned();
    inv.finish(scope).await?;

    let value = value.ok_or_else(|| SatchelError::KeyNotSet(args.key.clone()))?;

    match args.format {
        ValueFormat::Text => println!("{}", value),
        ValueFormat::Json => println!("{}", serde_json::to_string_pretty(&value.to_json())?),
    }

    Ok(())
}
