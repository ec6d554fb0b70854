//! Write command - store a value under a dotted key

use crate::cli::args::{ValueKind, WriteArgs};
use crate::cli::Invocation;
use crate::error::{SatchelError, SatchelResult};
use crate::session::SessionValue;
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};

/// Execute the write command
pub async fn execute(args: WriteArgs, inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let value = parse_value(args.kind, &args.value)?;

    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;
    let confirmed = store.write(&args.key, value)?;
    inv.finish(scope).await?;

    if confirmed {
        ui::step_ok(&ctx, &format!("Stored {}", args.key));
    } else {
        ui::step_warn_hint(
            &ctx,
            &format!("Stored {} but it does not read back", args.key),
            "three-segment keys land on the literal key under session.nesting = \"legacy\"",
        );
    }

    Ok(())
}

/// Interpret a command-line value
pub fn parse_value(kind: ValueKind, raw: &str) -> SatchelResult<SessionValue> {
    let invalid = |what: &str| SatchelError::invalid_argument(format!("'{}' is not {}", raw, what));

    match kind {
        ValueKind::Text => Ok(SessionValue::from(raw)),
        ValueKind::Int => raw
            .parse::<i64>()
            .map(SessionValue::from)
            .map_err(|_| invalid("an integer")),
        ValueKind::Float => raw
            .parse::<f64>()
            .map(SessionValue::from)
            .map_err(|_| invalid("a number")),
        ValueKind::Bool => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(SessionValue::from(true)),
            "false" | "no" | "0" => Ok(SessionValue::from(false)),
            _ => Err(invalid("a boolean")),
        },
        ValueKind::Timestamp => {
            if raw.eq_ignore_ascii_case("now") {
                return Ok(SessionValue::from(Utc::now()));
            }
            DateTime::parse_from_rfc3339(raw)
                .map(|t| SessionValue::from(t.with_timezone(&Utc)))
                .map_err(|_| invalid("an RFC 3339 timestamp"))
        }
        ValueKind::Json => {
            let json: serde_json::Value =
                serde_json::from_str(raw).map_err(|_| invalid("valid JSON"))?;
            SessionValue::try_from(json)
        }
    }
}
