use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A page catalog: the YAML-declared counterpart of building `PageTypeDef`s
/// in code. Deserialized from a file for human review, then loaded into a
/// `PageRegistry`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    pub pages: Vec<PageDecl>,
}

/// One declared page or component type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PageDecl {
    pub name: String,

    /// Parent type to inherit declarations from. Forward references within
    /// the same catalog are allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Literal-URL navigation identity. Mutually exclusive with `route`;
    /// component types declare neither.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Routed navigation identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteDecl>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortcuts: Vec<ShortcutEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteDecl {
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// A declared shortcut: either the compact `expr` form or structured
/// `strategy`/`selector` fields, not both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ShortcutEntry {
    pub name: String,

    /// Compact form: `"strategy=selector, tag, (attr=value, ...)"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Expected tag name (structured form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Expected attribute values (structured form).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collection: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActionEntry {
    pub name: String,
    pub shortcut: String,
    pub operation: String,

    /// Ordered candidate destination page names.
    pub goes_to: Vec<String>,
}
