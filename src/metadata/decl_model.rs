use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

/// Reference to a page/component type. Runtime type identity is pointer
/// identity of the shared definition.
pub type TypeRef = Rc<PageTypeDef>;

/// Where a page lives: either a literal URL, or a logical route plus its
/// parameters (translated to/from URLs by the driver collaborator).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationIdentity {
    Url(String),
    Route {
        name: String,
        parameters: BTreeMap<String, String>,
    },
}

/// A declared element shortcut: a named binding from the owning type to one
/// or more elements, located by strategy/selector and optionally validated
/// by tag and attribute values.
#[derive(Debug, Clone)]
pub struct ShortcutDecl {
    pub name: String,
    pub collection: bool,
    pub source: ShortcutSource,
}

/// Shortcuts are declared either with structured fields or as a compact
/// expression (`"strategy=selector, tag, (attr=value, ...)"`) that the
/// compiler parses on first use.
#[derive(Debug, Clone)]
pub enum ShortcutSource {
    Fields {
        strategy: String,
        selector: String,
        expected_tag: Option<String>,
        expected_attributes: Vec<(String, String)>,
    },
    Expr(String),
}

impl ShortcutDecl {
    pub fn new(
        name: impl Into<String>,
        strategy: impl Into<String>,
        selector: impl Into<String>,
    ) -> Self {
        ShortcutDecl {
            name: name.into(),
            collection: false,
            source: ShortcutSource::Fields {
                strategy: strategy.into(),
                selector: selector.into(),
                expected_tag: None,
                expected_attributes: Vec::new(),
            },
        }
    }

    /// Declare from a compact expression. Parsing is deferred to the
    /// compiler; a malformed expression surfaces as a `Metadata` error at the
    /// entry's first use.
    pub fn from_expr(name: impl Into<String>, expr: impl Into<String>) -> Self {
        ShortcutDecl {
            name: name.into(),
            collection: false,
            source: ShortcutSource::Expr(expr.into()),
        }
    }

    /// Mark the shortcut as resolving to a sequence of elements. An empty
    /// sequence is then a valid result.
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    /// Expected tag name, validated case-sensitively against each resolved
    /// element. Structured form only; the compact form carries the tag inside
    /// the expression.
    pub fn expected_tag(mut self, tag: impl Into<String>) -> Self {
        if let ShortcutSource::Fields { expected_tag, .. } = &mut self.source {
            *expected_tag = Some(tag.into());
        }
        self
    }

    /// Expected attribute value, validated in declaration order. Structured
    /// form only.
    pub fn expected_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let ShortcutSource::Fields {
            expected_attributes,
            ..
        } = &mut self.source
        {
            expected_attributes.push((name.into(), value.into()));
        }
        self
    }
}

/// A declared action method: invoke `operation` on the element behind
/// `shortcut`, then land on the first of `destinations` whose state
/// verifies. Destinations are page type names resolved through the registry
/// at dispatch time, so a list may name the declaring type itself.
#[derive(Debug, Clone)]
pub struct ActionDecl {
    pub name: String,
    pub shortcut: String,
    pub operation: String,
    pub destinations: Vec<String>,
}

impl ActionDecl {
    pub fn new<I, S>(
        name: impl Into<String>,
        shortcut: impl Into<String>,
        operation: impl Into<String>,
        destinations: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionDecl {
            name: name.into(),
            shortcut: shortcut.into(),
            operation: operation.into(),
            destinations: destinations.into_iter().map(Into::into).collect(),
        }
    }
}

/// The statically declared descriptor of one page/component type: its own
/// shortcut, action and identity declarations, plus an optional parent whose
/// declarations it inherits (specific wins on name clashes).
#[derive(Debug)]
pub struct PageTypeDef {
    name: String,
    parent: Option<TypeRef>,
    shortcuts: Vec<ShortcutDecl>,
    actions: Vec<ActionDecl>,
    identity: Option<NavigationIdentity>,
}

impl PageTypeDef {
    pub fn builder(name: impl Into<String>) -> PageTypeBuilder {
        PageTypeBuilder {
            def: PageTypeDef {
                name: name.into(),
                parent: None,
                shortcuts: Vec::new(),
                actions: Vec::new(),
                identity: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&TypeRef> {
        self.parent.as_ref()
    }

    pub(crate) fn shortcuts(&self) -> &[ShortcutDecl] {
        &self.shortcuts
    }

    pub(crate) fn actions(&self) -> &[ActionDecl] {
        &self.actions
    }

    pub(crate) fn identity(&self) -> Option<&NavigationIdentity> {
        self.identity.as_ref()
    }
}

/// Builder for `PageTypeDef`. Finishes with [`PageTypeBuilder::build`],
/// which hands out the shared `TypeRef`.
pub struct PageTypeBuilder {
    def: PageTypeDef,
}

impl PageTypeBuilder {
    /// Inherit declarations from a parent type.
    pub fn extends(mut self, parent: &TypeRef) -> Self {
        self.def.parent = Some(parent.clone());
        self
    }

    /// Literal-URL navigation identity.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.def.identity = Some(NavigationIdentity::Url(url.into()));
        self
    }

    /// Routed navigation identity.
    pub fn route<K, V, I>(mut self, name: impl Into<String>, parameters: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.def.identity = Some(NavigationIdentity::Route {
            name: name.into(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        });
        self
    }

    pub fn shortcut(mut self, decl: ShortcutDecl) -> Self {
        self.def.shortcuts.push(decl);
        self
    }

    pub fn action(mut self, decl: ActionDecl) -> Self {
        self.def.actions.push(decl);
        self
    }

    pub fn build(self) -> TypeRef {
        Rc::new(self.def)
    }
}
