use crate::output::{print_json, render_table};
use dpaudit_core::category::Category;
use dpaudit_core::kind::ActionKind;
use serde::Serialize;

#[derive(Serialize)]
struct KindRow {
    kind: &'static str,
    category: &'static str,
    abbr: &'static str,
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let rows: Vec<KindRow> = ActionKind::all()
        .iter()
        .map(|&kind| {
            let category = Category::of(kind);
            KindRow {
                kind: kind.as_str(),
                category: category.as_str(),
                abbr: category.abbr(),
            }
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.kind.to_string(),
                r.category.to_string(),
                r.abbr.to_string(),
            ]
        })
        .collect();
    println!("{}", render_table(&["Kind", "Category", "Abbr"], &table_rows));
    Ok(())
}
