use crate::output::{print_json, print_yaml, render_table};
use anyhow::Context;
use dpaudit_core::inspect;
use dpaudit_core::report;
use std::path::Path;

pub fn run(
    backup_file: &Path,
    output_file: Option<&Path>,
    json: bool,
    no_summary: bool,
) -> anyhow::Result<()> {
    let backup = inspect::inspect_backup(backup_file)
        .with_context(|| format!("analyzing {}", backup_file.display()))?;

    match output_file {
        Some(path) => {
            let rendered = if json {
                serde_json::to_string_pretty(&backup)?
            } else {
                serde_yaml::to_string(&backup)?
            };
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("report written to {}", path.display());
        }
        None if json => print_json(&backup)?,
        None => print_yaml(&backup)?,
    }

    if !no_summary {
        print_summary(&backup);
    }
    Ok(())
}

/// Per-category occurrence counts across every domain in the backup.
/// Printed on stderr so stdout carries only the report itself.
fn print_summary(backup: &dpaudit_core::model::BackupInfo) {
    let groups = report::group_by_category(backup);
    if groups.is_empty() {
        eprintln!("no policy actions found");
        return;
    }

    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|(category, entries)| {
            let gateway_refs: usize = entries.values().map(|e| e.gateways.len()).sum();
            vec![
                category.as_str().to_string(),
                category.abbr().to_string(),
                entries.len().to_string(),
                gateway_refs.to_string(),
            ]
        })
        .collect();

    eprintln!();
    eprintln!(
        "{}",
        render_table(&["Category", "Abbr", "Actions", "Gateway refs"], &rows)
    );
    let total: usize = groups.values().map(|entries| entries.len()).sum();
    eprintln!("{total} distinct actions");
}
