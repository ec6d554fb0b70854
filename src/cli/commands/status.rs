//! Status command - inspect the current session without opening one

use crate::cli::Invocation;
use crate::config::Backend;
use crate::error::{SatchelError, SatchelResult};
use crate::session::{
    is_valid_session_id, FileTransport, SessionRecord, SessionValue, SESSION_ID_KEY,
    SESSION_START_KEY,
};
use crate::ui::{self, UiContext};
use chrono::Utc;

/// Execute the status command
pub async fn execute(inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let session = &inv.config.session;

    ui::intro(&ctx, "Session Status");
    ui::key_value(&ctx, "backend", session.backend.name());
    ui::key_value(&ctx, "nesting", session.nesting.name());
    ui::key_value(
        &ctx,
        "max lifetime",
        &format!("{} min", session.max_lifetime_minutes),
    );

    let Some(cookie) = inv.cookie().await? else {
        ui::step_info(&ctx, "No session cookie");
        ui::remark(&ctx, "Run: satchel open");
        return Ok(());
    };
    ui::key_value(&ctx, "cookie", &cookie);

    if session.backend != Backend::File {
        ui::step_info(&ctx, "In-memory sessions do not outlive a single invocation");
        return Ok(());
    }

    if !is_valid_session_id(&cookie) {
        ui::step_warn_hint(
            &ctx,
            "Cookie is not a valid session id",
            "the next command starts a new session",
        );
        return Ok(());
    }

    let record = FileTransport::load_record(&inv.manager.sessions_dir(), &cookie).await?;
    match record {
        Some(record) => print_record(&ctx, &record, session.max_lifetime_minutes),
        None if inv.session_override.is_some() => {
            return Err(SatchelError::SessionNotFound(cookie));
        }
        None => ui::step_warn_hint(
            &ctx,
            "Session not found on disk",
            "the next command starts a new session",
        ),
    }

    Ok(())
}

fn print_record(ctx: &UiContext, record: &SessionRecord, max_lifetime_minutes: u32) {
    let registered = record
        .data
        .get(SESSION_ID_KEY)
        .is_some_and(|v| !v.is_empty());
    ui::key_value_status(
        ctx,
        "registered",
        if registered { "yes" } else { "no" },
        registered,
    );
    ui::key_value(ctx, "keys", &record.data.len().to_string());
    ui::key_value(
        ctx,
        "last saved",
        &record.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    match record
        .data
        .get(SESSION_START_KEY)
        .and_then(SessionValue::as_timestamp)
    {
        Some(started) => {
            let age = (Utc::now() - started).num_minutes();
            let remaining = i64::from(max_lifetime_minutes) - age;
            ui::key_value(ctx, "age", &format!("{} min", age));
            if remaining > 0 {
                ui::key_value_status(ctx, "lifetime", &format!("{} min left", remaining), true);
            } else {
                ui::key_value_status(ctx, "lifetime", "expired, next gc closes it", false);
            }
        }
        None => ui::key_value_status(ctx, "lifetime", "no session_start, next gc closes it", false),
    }
}
