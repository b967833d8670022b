use std::path::Path;

use serde_json::Value;

use crate::error::PageError;
use crate::metadata::compiler::MetadataTable;
use crate::metadata::registry::PageRegistry;
use crate::schema::loader::{load_schema, register_schema};

// ============================================================================
// validate subcommand
// ============================================================================

/// Compile every type of a page catalog and force every metadata entry,
/// the eager counterpart of the runtime's lazy failure. Returns whether the
/// catalog is clean.
pub fn cmd_validate(schema_path: &str, verbose: u8) -> Result<bool, PageError> {
    let schema = load_schema(Path::new(schema_path))?;
    let registry = PageRegistry::new();
    let types = register_schema(&schema, &registry)?;

    if verbose > 0 {
        eprintln!("Validating {} page types from {}...", types.len(), schema_path);
    }

    let mut problem_count = 0;
    for ty in &types {
        let table = MetadataTable::compile(ty);
        let problems = table.validate(&registry);
        if verbose > 0 && problems.is_empty() {
            eprintln!("  ok: {}", ty.name());
        }
        for problem in &problems {
            println!("{}: {}", ty.name(), problem);
        }
        problem_count += problems.len();
    }

    println!(
        "{} page types checked, {} problems",
        types.len(),
        problem_count
    );
    Ok(problem_count == 0)
}

// ============================================================================
// describe subcommand
// ============================================================================

/// Print the merged, compiled metadata table of one page type (or of the
/// whole catalog) as pretty JSON.
pub fn cmd_describe(schema_path: &str, page: Option<&str>) -> Result<(), PageError> {
    let schema = load_schema(Path::new(schema_path))?;
    let registry = PageRegistry::new();
    let types = register_schema(&schema, &registry)?;

    let selected: Vec<_> = match page {
        Some(name) => vec![registry.resolve(name)?],
        None => types,
    };

    let mut pages = serde_json::Map::new();
    for ty in &selected {
        let table = MetadataTable::compile(ty);
        pages.insert(ty.name().to_string(), table_json(&table));
    }

    let document = Value::Object(
        [("pages".to_string(), Value::Object(pages))]
            .into_iter()
            .collect(),
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&document).unwrap_or_default()
    );
    Ok(())
}

/// JSON rendering of one compiled table. Poisoned shortcut entries render
/// as their error message instead of a definition.
fn table_json(table: &MetadataTable) -> Value {
    let mut shortcuts = serde_json::Map::new();
    for name in table.shortcut_names() {
        let value = match table.shortcut(name) {
            Some(Ok(def)) => serde_json::to_value(def).unwrap_or(Value::Null),
            Some(Err(e)) => serde_json::json!({ "error": e.to_string() }),
            None => Value::Null,
        };
        shortcuts.insert(name.to_string(), value);
    }

    let mut actions = serde_json::Map::new();
    for name in table.action_names() {
        if let Some(action) = table.action(name) {
            actions.insert(
                name.to_string(),
                serde_json::to_value(action).unwrap_or(Value::Null),
            );
        }
    }

    serde_json::json!({
        "identity": table.identity(),
        "shortcuts": shortcuts,
        "actions": actions,
    })
}
