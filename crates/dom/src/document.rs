//! The document host: containers for style elements, the readiness state
//! used before the environment finishes initializing, and the staging queue
//! of deferred elements.

use crate::element::StyleElement;
use crate::prototype::SheetPrototype;
use crate::sheet::{CssStyleSheet, SheetId};
use log::debug;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

struct DocumentInner {
    prototype: Rc<RefCell<SheetPrototype>>,
    frame_body: Vec<StyleElement>,
    head: Vec<StyleElement>,
    deferred: Vec<StyleElement>,
    created_sheets: HashSet<SheetId>,
    loaded: bool,
    has_shady_css: bool,
}

/// One styling environment. Independent documents share nothing, including
/// their prototypes, so installations never leak across them.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        formatter
            .debug_struct("Document")
            .field("loaded", &inner.loaded)
            .field("has_shady_css", &inner.has_shady_css)
            .field("frame_body", &inner.frame_body.len())
            .field("head", &inner.head.len())
            .field("deferred", &inner.deferred.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A fresh document that has not finished loading yet.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                prototype: Rc::new(RefCell::new(SheetPrototype::native())),
                frame_body: Vec::new(),
                head: Vec::new(),
                deferred: Vec::new(),
                created_sheets: HashSet::new(),
                loaded: false,
                has_shady_css: false,
            })),
        }
    }

    pub fn prototype(&self) -> Rc<RefCell<SheetPrototype>> {
        Rc::clone(&self.inner.borrow().prototype)
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.borrow().loaded
    }

    pub fn has_shady_css(&self) -> bool {
        self.inner.borrow().has_shady_css
    }

    /// Mark the environment as carrying the legacy style-scoping layer.
    pub fn enable_shady_css(&self) {
        self.inner.borrow_mut().has_shady_css = true;
    }

    /// A detached style element; it has no native sheet until attached.
    pub fn create_style_element(&self) -> StyleElement {
        StyleElement::new()
    }

    /// Attach to the hidden frame container, materializing the sheet.
    pub fn append_to_frame_body(&self, element: &StyleElement) -> CssStyleSheet {
        let sheet = {
            let inner = self.inner.borrow();
            element.materialize_sheet(&Rc::downgrade(&inner.prototype))
        };
        let mut inner = self.inner.borrow_mut();
        inner.created_sheets.insert(sheet.id());
        detach(&mut inner, element);
        inner.frame_body.push(element.clone());
        sheet
    }

    /// Attach to the document head (the pre-initialization staging area).
    pub fn append_to_head(&self, element: &StyleElement) -> CssStyleSheet {
        let sheet = {
            let inner = self.inner.borrow();
            element.materialize_sheet(&Rc::downgrade(&inner.prototype))
        };
        let mut inner = self.inner.borrow_mut();
        inner.created_sheets.insert(sheet.id());
        detach(&mut inner, element);
        inner.head.push(element.clone());
        sheet
    }

    /// Queue a staged element for migration once loading completes.
    pub fn push_deferred(&self, element: &StyleElement) {
        self.inner.borrow_mut().deferred.push(element.clone());
    }

    /// Flip the readiness flag and migrate every deferred element from the
    /// head to the frame container, re-enabling it. Sheets keep their
    /// identity across the move.
    pub fn finish_loading(&self) {
        let deferred = {
            let mut inner = self.inner.borrow_mut();
            inner.loaded = true;
            std::mem::take(&mut inner.deferred)
        };
        debug!("document loaded; migrating {} deferred style element(s)", deferred.len());
        for element in &deferred {
            element.set_disabled(false);
            let mut inner = self.inner.borrow_mut();
            detach(&mut inner, element);
            inner.frame_body.push(element.clone());
        }
    }

    /// The environment's own identity check: was this sheet produced by this
    /// document at all (constructed or not)?
    pub fn instance_of_stylesheet(&self, sheet: &CssStyleSheet) -> bool {
        self.inner.borrow().created_sheets.contains(&sheet.id())
    }

    pub fn frame_body(&self) -> Vec<StyleElement> {
        self.inner.borrow().frame_body.clone()
    }

    pub fn head(&self) -> Vec<StyleElement> {
        self.inner.borrow().head.clone()
    }

    pub fn deferred(&self) -> Vec<StyleElement> {
        self.inner.borrow().deferred.clone()
    }
}

fn detach(inner: &mut DocumentInner, element: &StyleElement) {
    inner.frame_body.retain(|existing| existing != element);
    inner.head.retain(|existing| existing != element);
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn detached_elements_have_no_sheet() {
        let document = Document::new();
        let element = document.create_style_element();
        assert!(element.sheet().is_none());
    }

    #[test]
    fn attachment_materializes_a_stable_sheet() {
        let document = Document::new();
        let element = document.create_style_element();
        element.set_css_text("a { color: red }");

        let sheet = document.append_to_head(&element);
        assert_eq!(sheet.rules().len(), 1);
        assert!(document.instance_of_stylesheet(&sheet));

        // Moving the element keeps the same sheet object.
        let moved = document.append_to_frame_body(&element);
        assert_eq!(sheet.id(), moved.id(), "sheet identity must survive moves");
        assert_eq!(document.head().len(), 0);
        assert_eq!(document.frame_body().len(), 1);
    }

    #[test]
    fn finish_loading_migrates_deferred_elements() {
        let document = Document::new();
        let element = document.create_style_element();
        let sheet = document.append_to_head(&element);
        element.set_disabled(true);
        document.push_deferred(&element);

        document.finish_loading();

        assert!(document.is_loaded());
        assert!(!element.disabled());
        assert_eq!(document.head().len(), 0);
        assert_eq!(document.frame_body().len(), 1);
        assert_eq!(document.deferred().len(), 0);
        assert_eq!(element.sheet().map(|migrated| migrated.id()), Some(sheet.id()));
    }

    #[test]
    fn foreign_sheets_fail_the_native_identity_check() {
        let first = Document::new();
        let second = Document::new();
        let element = first.create_style_element();
        let sheet = first.append_to_frame_body(&element);
        assert!(first.instance_of_stylesheet(&sheet));
        assert!(!second.instance_of_stylesheet(&sheet));
    }
}
