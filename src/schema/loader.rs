use std::collections::HashSet;
use std::path::Path;

use crate::error::PageError;
use crate::metadata::decl_model::{ActionDecl, PageTypeDef, ShortcutDecl, TypeRef};
use crate::metadata::registry::PageRegistry;
use crate::schema::schema_model::{PageDecl, Schema, ShortcutEntry};

/// Read a page catalog from a YAML file.
pub fn load_schema(path: &Path) -> Result<Schema, PageError> {
    let content = std::fs::read_to_string(path).map_err(|e| PageError::Metadata {
        type_name: path.display().to_string(),
        detail: format!("cannot read schema file: {}", e),
    })?;
    serde_yaml::from_str(&content).map_err(|e| PageError::Metadata {
        type_name: path.display().to_string(),
        detail: format!("malformed schema file: {}", e),
    })
}

/// Build every declared type and register it. Declarations may reference a
/// parent declared later in the same catalog (or already present in the
/// registry); an unresolvable parent or a duplicate name is a `Metadata`
/// error. Returns the built types in registration order.
pub fn register_schema(
    schema: &Schema,
    registry: &PageRegistry,
) -> Result<Vec<TypeRef>, PageError> {
    let mut seen = HashSet::new();
    for decl in &schema.pages {
        if !seen.insert(decl.name.as_str()) {
            return Err(PageError::Metadata {
                type_name: decl.name.clone(),
                detail: "page type declared more than once".to_string(),
            });
        }
    }

    let mut pending: Vec<&PageDecl> = schema.pages.iter().collect();
    let mut built = Vec::new();
    while !pending.is_empty() {
        let mut remaining = Vec::new();
        let mut progressed = false;
        for decl in pending {
            let parent = match &decl.extends {
                None => None,
                Some(name) => match registry.get(name) {
                    Some(ty) => Some(ty),
                    None => {
                        remaining.push(decl);
                        continue;
                    }
                },
            };
            let ty = build_type(decl, parent)?;
            registry.register(ty.clone());
            built.push(ty);
            progressed = true;
        }
        if !progressed {
            let decl = remaining[0];
            return Err(PageError::Metadata {
                type_name: decl.name.clone(),
                detail: format!(
                    "unknown parent type '{}'",
                    decl.extends.as_deref().unwrap_or_default()
                ),
            });
        }
        pending = remaining;
    }
    Ok(built)
}

fn build_type(decl: &PageDecl, parent: Option<TypeRef>) -> Result<TypeRef, PageError> {
    let mut builder = PageTypeDef::builder(&decl.name);

    if let Some(parent) = &parent {
        builder = builder.extends(parent);
    }

    match (&decl.url, &decl.route) {
        (Some(_), Some(_)) => {
            return Err(PageError::Metadata {
                type_name: decl.name.clone(),
                detail: "declares both a url and a route identity".to_string(),
            });
        }
        (Some(url), None) => builder = builder.url(url),
        (None, Some(route)) => {
            builder = builder.route(&route.name, route.parameters.clone());
        }
        (None, None) => {}
    }

    for entry in &decl.shortcuts {
        builder = builder.shortcut(build_shortcut(&decl.name, entry)?);
    }

    for entry in &decl.actions {
        builder = builder.action(ActionDecl::new(
            &entry.name,
            &entry.shortcut,
            &entry.operation,
            entry.goes_to.iter().map(String::as_str),
        ));
    }

    Ok(builder.build())
}

fn build_shortcut(page: &str, entry: &ShortcutEntry) -> Result<ShortcutDecl, PageError> {
    let mut decl = match (&entry.expr, &entry.strategy, &entry.selector) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(PageError::Metadata {
                type_name: page.to_string(),
                detail: format!(
                    "shortcut '{}' declares both an expr and structured fields",
                    entry.name
                ),
            });
        }
        (Some(expr), None, None) => {
            if entry.tag.is_some() || !entry.attributes.is_empty() {
                return Err(PageError::Metadata {
                    type_name: page.to_string(),
                    detail: format!(
                        "shortcut '{}': tag/attributes belong inside the expr form",
                        entry.name
                    ),
                });
            }
            ShortcutDecl::from_expr(&entry.name, expr)
        }
        (None, Some(strategy), Some(selector)) => {
            let mut decl = ShortcutDecl::new(&entry.name, strategy, selector);
            if let Some(tag) = &entry.tag {
                decl = decl.expected_tag(tag);
            }
            for (name, value) in &entry.attributes {
                decl = decl.expected_attribute(name, value);
            }
            decl
        }
        _ => {
            return Err(PageError::Metadata {
                type_name: page.to_string(),
                detail: format!(
                    "shortcut '{}' needs either an expr or a strategy/selector pair",
                    entry.name
                ),
            });
        }
    };
    if entry.collection {
        decl = decl.collection();
    }
    Ok(decl)
}
