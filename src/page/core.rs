use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::driver::driver_model::ElementHandle;
use crate::driver::session::Session;
use crate::metadata::compiler::MetadataTable;
use crate::metadata::decl_model::TypeRef;

/// Per-instance engine state shared by every node kind: the memoized
/// compiled metadata table and the memoized single-element shortcut
/// resolutions. Both are write-once-then-read, populated lazily by the
/// single owning thread.
pub(crate) struct ComponentCore {
    pub(crate) session: Session,
    pub(crate) ty: TypeRef,
    table: OnceCell<Rc<MetadataTable>>,
    pub(crate) resolved: RefCell<HashMap<String, ElementHandle>>,
}

impl ComponentCore {
    pub(crate) fn new(session: Session, ty: TypeRef) -> Self {
        ComponentCore {
            session,
            ty,
            table: OnceCell::new(),
            resolved: RefCell::new(HashMap::new()),
        }
    }

    /// The merged metadata table, compiled on first access.
    pub(crate) fn table(&self) -> Rc<MetadataTable> {
        self.table
            .get_or_init(|| Rc::new(MetadataTable::compile(&self.ty)))
            .clone()
    }
}
