//! The injectable runtime that owns the registries for one document and
//! carries the construction path, the identity predicate, and the surface
//! the adoption subsystem works against.

use crate::compat::CompatLocation;
use crate::intercept::{self, InterceptContext};
use crate::registry::{CompatRegistry, SheetRecord, SheetRegistry};
use dom::{CssStyleSheet, Document, SheetOp, StyleElement};
use log::{debug, warn};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// One constructible-stylesheet environment over one [`Document`]. Two
/// runtimes never share registries, so tests and independent documents
/// cannot contaminate each other.
#[derive(Clone)]
pub struct SheetRuntime {
    document: Document,
    registry: Rc<RefCell<SheetRegistry>>,
    compat: Rc<RefCell<CompatRegistry>>,
    has_shady_css: bool,
    installed: Rc<Cell<bool>>,
}

impl SheetRuntime {
    /// Build a runtime for a document. The legacy-layer signal is sampled
    /// here, once, the way the environment reports it at startup.
    pub fn new(document: Document) -> Self {
        let has_shady_css = document.has_shady_css();
        Self {
            document,
            registry: Rc::new(RefCell::new(SheetRegistry::default())),
            compat: Rc::new(RefCell::new(CompatRegistry::default())),
            has_shady_css,
            installed: Rc::new(Cell::new(false)),
        }
    }

    fn context(&self) -> InterceptContext {
        InterceptContext {
            registry: Rc::clone(&self.registry),
            compat: Rc::clone(&self.compat),
            has_shady_css: self.has_shady_css,
        }
    }

    /// Install the interception wrappers and the replacement methods onto
    /// the document's stylesheet prototype. Must run once, before any
    /// construction; repeated calls are ignored.
    pub fn install(&self) {
        if self.installed.replace(true) {
            warn!("stylesheet prototype already instrumented for this document; ignoring");
            return;
        }
        intercept::update_prototype(&self.document.prototype(), &self.context());
        debug!("instrumented stylesheet prototype");
    }

    /// The construction path: a hidden backing element, attached per the
    /// document's readiness, whose native sheet becomes the constructed
    /// stylesheet.
    pub fn construct(&self) -> CssStyleSheet {
        let element = self.document.create_style_element();
        let sheet = if self.document.is_loaded() {
            self.document.append_to_frame_body(&element)
        } else {
            // Not ready yet: stage in head, inert, queued for migration.
            let sheet = self.document.append_to_head(&element);
            element.set_disabled(true);
            self.document.push_deferred(&element);
            sheet
        };
        self.registry
            .borrow_mut()
            .insert(sheet.id(), SheetRecord::new(element));
        debug!("constructed stylesheet {:?}", sheet.id());
        sheet
    }

    /// Capability-based identity: registry membership, or whatever the
    /// environment's own native check would accept.
    pub fn is_constructed_stylesheet(&self, sheet: &CssStyleSheet) -> bool {
        self.registry.borrow().has(sheet) || self.document.instance_of_stylesheet(sheet)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Read access for the adoption subsystem: action logs and backing
    /// content by sheet identity.
    pub fn registry(&self) -> Ref<'_, SheetRegistry> {
        self.registry.borrow()
    }

    /// Cloned action log of a constructed sheet, if any.
    pub fn action_log(&self, sheet: &CssStyleSheet) -> Option<Vec<SheetOp>> {
        self.registry
            .borrow()
            .get(sheet)
            .map(|record| record.actions.clone())
    }

    /// Record a new adopter for a constructed sheet. Adoption policy and
    /// catch-up replay live outside this engine; this only maintains the
    /// collection. Returns false for unregistered sheets.
    pub fn add_adopter(&self, sheet: &CssStyleSheet, element: &StyleElement) -> bool {
        let mut registry = self.registry.borrow_mut();
        match registry.get_mut(sheet) {
            Some(record) => {
                record.adopters.push(element.clone());
                true
            }
            None => false,
        }
    }

    /// Drop an adopter from a constructed sheet's record.
    pub fn remove_adopter(&self, sheet: &CssStyleSheet, element: &StyleElement) -> bool {
        let mut registry = self.registry.borrow_mut();
        match registry.get_mut(sheet) {
            Some(record) => {
                let found = record.adopters.iter().position(|existing| existing == element);
                match found {
                    Some(at) => {
                        record.adopters.remove(at);
                        true
                    }
                    None => false,
                }
            }
            None => false,
        }
    }

    /// Associate the 0-or-1 compatibility location that must be re-triggered
    /// whenever this sheet's content changes.
    pub fn set_compat_location(&self, sheet: &CssStyleSheet, location: &CompatLocation) -> bool {
        if !self.registry.borrow().has(sheet) {
            return false;
        }
        self.compat.borrow_mut().insert(sheet.id(), location.clone());
        true
    }
}
