//! Style elements: the surfaces that carry stylesheet text. An element has a
//! native sheet only once the document has attached it somewhere.

use crate::prototype::SheetPrototype;
use crate::sheet::CssStyleSheet;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct ElementInner {
    css_text: String,
    disabled: bool,
    sheet: Option<CssStyleSheet>,
}

/// Cheap-clone handle to a style element. Equality is object identity.
#[derive(Clone)]
pub struct StyleElement {
    inner: Rc<RefCell<ElementInner>>,
}

impl PartialEq for StyleElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for StyleElement {}

impl fmt::Debug for StyleElement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        formatter
            .debug_struct("StyleElement")
            .field("css_text", &inner.css_text)
            .field("disabled", &inner.disabled)
            .field("has_sheet", &inner.sheet.is_some())
            .finish()
    }
}

impl StyleElement {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementInner {
                css_text: String::new(),
                disabled: false,
                sheet: None,
            })),
        }
    }

    /// Full stylesheet text of the element ("innerHTML" of a style tag).
    pub fn css_text(&self) -> String {
        self.inner.borrow().css_text.clone()
    }

    /// Assign the element's full text. If the element has a live sheet, its
    /// rule list is re-derived synchronously.
    pub fn set_css_text(&self, css_text: &str) {
        let sheet = {
            let mut inner = self.inner.borrow_mut();
            inner.css_text = css_text.to_owned();
            inner.sheet.clone()
        };
        if let Some(sheet) = sheet {
            sheet.reset_rules(css_text);
        }
    }

    pub fn disabled(&self) -> bool {
        self.inner.borrow().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// The element's native sheet, present only after attachment.
    pub fn sheet(&self) -> Option<CssStyleSheet> {
        self.inner.borrow().sheet.clone()
    }

    /// Create the native sheet on first attachment; later attachments keep
    /// the same sheet object so its identity stays stable across moves.
    pub(crate) fn materialize_sheet(
        &self,
        prototype: &Weak<RefCell<SheetPrototype>>,
    ) -> CssStyleSheet {
        let existing = self.inner.borrow().sheet.clone();
        if let Some(sheet) = existing {
            return sheet;
        }
        let css_text = self.css_text();
        let sheet = CssStyleSheet::new(prototype.clone(), &css_text);
        self.inner.borrow_mut().sheet = Some(sheet.clone());
        sheet
    }
}
