use std::collections::HashMap;

use serde::Serialize;

use crate::error::PageError;
use crate::metadata::decl_model::{NavigationIdentity, ShortcutSource, TypeRef};
use crate::metadata::registry::PageRegistry;

/// A compiled element shortcut, immutable per (owning type, name).
#[derive(Debug, Clone, Serialize)]
pub struct ShortcutDef {
    pub strategy: String,
    pub selector: String,
    pub collection: bool,
    pub expected_tag: Option<String>,
    /// Validated in declaration order; first mismatch wins.
    pub expected_attributes: Vec<(String, String)>,
    /// The type in the ancestor chain that contributed this definition.
    pub defined_by: String,
}

impl ShortcutDef {
    /// Diagnostic subject of this shortcut: `DefiningType::name`, plus an
    /// element index for collection entries.
    pub fn subject(&self, name: &str, index: Option<usize>) -> String {
        match index {
            Some(i) => format!("{}::{}[{}]", self.defined_by, name, i),
            None => format!("{}::{}", self.defined_by, name),
        }
    }
}

/// A compiled action method, immutable per (owning type, name).
#[derive(Debug, Clone, Serialize)]
pub struct ActionDef {
    pub shortcut: String,
    pub operation: String,
    /// Ordered candidate destination page type names; order is the tie-break
    /// when several candidates could match.
    pub destinations: Vec<String>,
    pub defined_by: String,
}

/// The merged metadata of one concrete type: every shortcut and action
/// declared across its ancestor chain, keyed by name, with a definition on a
/// more specific type overriding the same name on a more general one.
///
/// Built lazily, once, and memoized per component instance. A malformed
/// shortcut declaration poisons only its own entry; the error surfaces at
/// that entry's first access and sibling entries stay usable.
#[derive(Debug)]
pub struct MetadataTable {
    type_name: String,
    shortcuts: HashMap<String, Result<ShortcutDef, PageError>>,
    actions: HashMap<String, ActionDef>,
    identity: Option<NavigationIdentity>,
}

impl MetadataTable {
    /// Compile the merged table for a type. Walks the ancestor chain from
    /// most general to most specific, processing each type's own
    /// declarations only, inserting/overwriting entries by name.
    pub fn compile(ty: &TypeRef) -> MetadataTable {
        let mut chain = Vec::new();
        let mut cursor = Some(ty.clone());
        while let Some(t) = cursor {
            cursor = t.parent().cloned();
            chain.push(t);
        }
        chain.reverse();

        let mut table = MetadataTable {
            type_name: ty.name().to_string(),
            shortcuts: HashMap::new(),
            actions: HashMap::new(),
            identity: None,
        };

        for t in &chain {
            for decl in t.shortcuts() {
                table
                    .shortcuts
                    .insert(decl.name.clone(), compile_shortcut(decl, t.name()));
            }
            for decl in t.actions() {
                table.actions.insert(
                    decl.name.clone(),
                    ActionDef {
                        shortcut: decl.shortcut.clone(),
                        operation: decl.operation.clone(),
                        destinations: decl.destinations.clone(),
                        defined_by: t.name().to_string(),
                    },
                );
            }
            if let Some(identity) = t.identity() {
                table.identity = Some(identity.clone());
            }
        }

        table
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn identity(&self) -> Option<&NavigationIdentity> {
        self.identity.as_ref()
    }

    /// Look up a shortcut entry. `None` for an undeclared name; a poisoned
    /// entry re-raises its compilation error.
    pub fn shortcut(&self, name: &str) -> Option<Result<&ShortcutDef, PageError>> {
        self.shortcuts
            .get(name)
            .map(|entry| entry.as_ref().map_err(Clone::clone))
    }

    pub fn action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.get(name)
    }

    pub fn shortcut_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shortcuts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Force every entry of the table and report all problems, for eager
    /// catalog validation (the runtime itself stays lazy).
    pub fn validate(&self, registry: &PageRegistry) -> Vec<PageError> {
        let mut problems = Vec::new();

        for name in self.shortcut_names() {
            if let Some(Err(e)) = self.shortcut(name) {
                problems.push(e);
            }
        }

        for name in self.action_names() {
            let action = match self.action(name) {
                Some(action) => action,
                None => continue,
            };
            match self.shortcut(&action.shortcut) {
                None => problems.push(PageError::Metadata {
                    type_name: self.type_name.clone(),
                    detail: format!(
                        "action '{}' targets undeclared shortcut '{}'",
                        name, action.shortcut
                    ),
                }),
                Some(Ok(def)) if def.collection => {
                    problems.push(PageError::InvalidArgument(format!(
                        "action '{}' of '{}' targets collection shortcut '{}'",
                        name, self.type_name, action.shortcut
                    )));
                }
                Some(_) => {}
            }
            if action.destinations.is_empty() {
                problems.push(PageError::Metadata {
                    type_name: self.type_name.clone(),
                    detail: format!("action '{}' declares no destination types", name),
                });
            }
            for destination in &action.destinations {
                if let Err(e) = registry.resolve(destination) {
                    problems.push(e);
                }
            }
        }

        problems
    }
}

fn compile_shortcut(
    decl: &crate::metadata::decl_model::ShortcutDecl,
    defined_by: &str,
) -> Result<ShortcutDef, PageError> {
    match &decl.source {
        ShortcutSource::Fields {
            strategy,
            selector,
            expected_tag,
            expected_attributes,
        } => Ok(ShortcutDef {
            strategy: strategy.clone(),
            selector: selector.clone(),
            collection: decl.collection,
            expected_tag: expected_tag.clone(),
            expected_attributes: expected_attributes.clone(),
            defined_by: defined_by.to_string(),
        }),
        ShortcutSource::Expr(expr) => {
            let parsed = parse_selector_expr(expr).map_err(|detail| PageError::Metadata {
                type_name: defined_by.to_string(),
                detail: format!("shortcut '{}': {}", decl.name, detail),
            })?;
            Ok(ShortcutDef {
                strategy: parsed.strategy,
                selector: parsed.selector,
                collection: decl.collection,
                expected_tag: parsed.expected_tag,
                expected_attributes: parsed.expected_attributes,
                defined_by: defined_by.to_string(),
            })
        }
    }
}

struct ParsedExpr {
    strategy: String,
    selector: String,
    expected_tag: Option<String>,
    expected_attributes: Vec<(String, String)>,
}

/// Parse the compact shortcut expression:
/// `strategy=selector[, expected_tag][, (attr=value, ...)]`.
///
/// Segments split on top-level commas; commas inside the parenthesised
/// attribute block belong to the block. Selectors containing top-level
/// commas need the structured declaration form instead.
fn parse_selector_expr(expr: &str) -> Result<ParsedExpr, String> {
    let segments = split_top_level(expr);
    let mut segments = segments.iter().map(|s| s.trim());

    let head = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "empty selector expression".to_string())?;
    let (strategy, selector) = head
        .split_once('=')
        .ok_or_else(|| format!("expected 'strategy=selector', got '{}'", head))?;
    let strategy = strategy.trim();
    let selector = selector.trim();
    if strategy.is_empty() || selector.is_empty() {
        return Err(format!("expected 'strategy=selector', got '{}'", head));
    }

    let mut expected_tag = None;
    let mut expected_attributes = Vec::new();
    let mut saw_attributes = false;
    for segment in segments {
        if saw_attributes {
            return Err(format!(
                "unexpected trailing segment '{}' after attribute block",
                segment
            ));
        }
        if let Some(block) = segment.strip_prefix('(') {
            let block = block
                .strip_suffix(')')
                .ok_or_else(|| format!("unterminated attribute block '{}'", segment))?;
            for pair in block.split(',') {
                let pair = pair.trim();
                if pair.is_empty() {
                    continue;
                }
                let (name, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("expected 'attribute=value', got '{}'", pair))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(format!("expected 'attribute=value', got '{}'", pair));
                }
                expected_attributes.push((name.to_string(), value.trim().to_string()));
            }
            saw_attributes = true;
        } else if expected_tag.is_none() && !segment.is_empty() {
            expected_tag = Some(segment.to_string());
        } else {
            return Err(format!("unexpected segment '{}'", segment));
        }
    }

    Ok(ParsedExpr {
        strategy: strategy.to_string(),
        selector: selector.to_string(),
        expected_tag,
        expected_attributes,
    })
}

fn split_top_level(expr: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    for c in expr.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}
