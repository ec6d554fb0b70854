//! List command - show stored sessions

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::Invocation;
use crate::config::Backend;
use crate::error::SatchelResult;
use crate::session::{FileTransport, SessionRecord};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, inv: &Invocation) -> SatchelResult<()> {
    let ctx = UiContext::detect();

    if inv.config.session.backend != Backend::File {
        ui::step_info(&ctx, "The memory backend keeps no sessions between invocations");
        return Ok(());
    }

    let records = FileTransport::list_records(&inv.manager.sessions_dir()).await?;
    let current = inv.cookie().await?;

    if records.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&ctx, "No stored sessions"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&records, current.as_deref()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for record in &records {
                println!("{}", record.id);
            }
        }
    }

    Ok(())
}

fn print_table(records: &[SessionRecord], current: Option<&str>) {
    println!(
        "  {:<38} {:<18} {:<18} {}",
        style("ID").bold(),
        style("CREATED").bold(),
        style("UPDATED").bold(),
        style("KEYS").bold()
    );
    println!("{}", "-".repeat(84));

    for record in records {
        let marker = if current == Some(record.id.as_str()) {
            style("*").green()
        } else {
            style(" ")
        };

        println!(
            "{} {:<38} {:<18} {:<18} {}",
            marker,
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.updated_at.format("%Y-%m-%d %H:%M"),
            record.data.len()
        );
    }

    println!();
    println!("{} session(s)", records.len());
}
