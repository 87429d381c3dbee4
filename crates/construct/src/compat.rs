//! Re-trigger signal for environments carrying a legacy style-scoping layer.
//! The engine never talks to that layer directly; it only re-assigns the
//! location's adopted list to itself so the layer re-evaluates.

use dom::CssStyleSheet;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct CompatInner {
    adopted: Vec<CssStyleSheet>,
    generation: u64,
}

/// An external root whose `adopted_style_sheets` assignment is watched by
/// the legacy layer. Every assignment, including a self-assignment, bumps
/// the generation.
#[derive(Clone, Default)]
pub struct CompatLocation {
    inner: Rc<RefCell<CompatInner>>,
}

impl fmt::Debug for CompatLocation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        formatter
            .debug_struct("CompatLocation")
            .field("adopted", &inner.adopted.len())
            .field("generation", &inner.generation)
            .finish()
    }
}

impl CompatLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adopted_style_sheets(&self) -> Vec<CssStyleSheet> {
        self.inner.borrow().adopted.clone()
    }

    pub fn set_adopted_style_sheets(&self, sheets: Vec<CssStyleSheet>) {
        let mut inner = self.inner.borrow_mut();
        inner.adopted = sheets;
        inner.generation += 1;
    }

    /// How many times the adopted list has been assigned; the observable
    /// side of the re-trigger signal.
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// The no-op-looking write used purely as a change signal.
    pub(crate) fn nudge(&self) {
        let sheets = self.adopted_style_sheets();
        self.set_adopted_style_sheets(sheets);
    }
}
