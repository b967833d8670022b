use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::PageError;
use crate::metadata::decl_model::TypeRef;

/// Name → type lookup for page types. Destination lists in action
/// declarations carry names, resolved here lazily at dispatch time; an
/// unknown name is a `Metadata` error at first use, and self-referencing
/// destination lists need no special casing.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct PageRegistry {
    types: Rc<RefCell<HashMap<String, TypeRef>>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        PageRegistry::default()
    }

    /// Register a type under its declared name, replacing any previous
    /// registration. Returns the same reference for chaining into other
    /// declarations.
    pub fn register(&self, ty: TypeRef) -> TypeRef {
        self.types
            .borrow_mut()
            .insert(ty.name().to_string(), ty.clone());
        ty
    }

    pub fn get(&self, name: &str) -> Option<TypeRef> {
        self.types.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.borrow().contains_key(name)
    }

    /// Like [`PageRegistry::get`], but an unknown name is a `Metadata`
    /// error.
    pub fn resolve(&self, name: &str) -> Result<TypeRef, PageError> {
        self.get(name).ok_or_else(|| PageError::Metadata {
            type_name: name.to_string(),
            detail: format!("page type '{}' is not registered", name),
        })
    }

    /// All registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
