//! Dump command - print the whole session map

use crate::cli::args::{DumpArgs, OutputFormat};
use crate::cli::Invocation;
use crate::error::SatchelResult;
use crate::session::{SessionMap, SessionValue};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the dump command
pub async fn execute(args: DumpArgs, inv: &Invocation) -> SatchelResult<()> {
    let mut scope = inv.begin().await?;
    let store = inv.attach(&mut scope).await?;
    let data = store.debug().clone();
    inv.finish(scope).await?;

    match args.format {
        OutputFormat::Table => print_table(&data),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data.to_json())?),
        OutputFormat::Plain => {
            for (key, _, _) in flatten(&data) {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

/// Rows of (dotted key, type, value); nested maps are expanded
pub fn flatten(map: &SessionMap) -> Vec<(String, &'static str, String)> {
    let mut rows = Vec::new();
    collect(None, map, &mut rows);
    rows
}

fn collect(prefix: Option<&str>, map: &SessionMap, rows: &mut Vec<(String, &'static str, String)>) {
    for (key, value) in map {
        let full = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };

        match value {
            SessionValue::Map(inner) if !inner.is_empty() => collect(Some(&full), inner, rows),
            _ => rows.push((full, value.type_name(), value.to_string())),
        }
    }
}

fn print_table(data: &SessionMap) {
    let ctx = UiContext::detect();

    if data.is_empty() {
        ui::step_info(&ctx, "Session is empty");
        return;
    }

    println!(
        "{:<32} {:<10} {}",
        style("KEY").bold(),
        style("TYPE").bold(),
        style("VALUE").bold()
    );
    println!("{}", "-".repeat(72));

    let rows = flatten(data);
    for (key, kind, value) in &rows {
        println!("{:<32} {:<10} {}", key, style(kind).dim(), value);
    }

    println!();
    println!("{} key(s)", rows.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::KeyPath;

    #[test]
    fn flatten_expands_nested_maps() {
        let mut map = SessionMap::new();
        map.insert("a", SessionValue::from("x"));
        map.insert_path(&KeyPath::parse("user.prefs.theme"), SessionValue::from("dark"))
            .unwrap();
        map.insert("empty", SessionValue::Map(SessionMap::new()));

        let rows = flatten(&map);
        let keys: Vec<&str> = rows.iter().map(|(k, _, _)| k.as_str()).collect();

        assert_eq!(keys, vec!["a", "empty", "user.prefs.theme"]);
        assert_eq!(rows[1].1, "map");
    }
}
