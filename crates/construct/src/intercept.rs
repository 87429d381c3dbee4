//! The method-interception layer. Once the original engine behavior ran and
//! succeeded, a mutating call on a registered sheet is fanned out to its
//! adopters, signals the legacy layer, and lands in the action log.

use crate::registry::{CompatRegistry, SheetRegistry};
use crate::replace::{make_replace, make_replace_sync};
use dom::{CssStyleSheet, RuleMethod, SheetId, SheetOp, SheetPrototype, StyleElement};
use log::debug;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything a wrapped method needs; cheap to clone into each slot. Holds
/// no document handle, so installed prototypes never keep a document alive.
#[derive(Clone)]
pub(crate) struct InterceptContext {
    pub(crate) registry: Rc<RefCell<SheetRegistry>>,
    pub(crate) compat: Rc<RefCell<CompatRegistry>>,
    pub(crate) has_shady_css: bool,
}

impl InterceptContext {
    /// Re-assign the compat location's adopted list to itself, if the legacy
    /// layer is active and a location is registered for this sheet.
    pub(crate) fn nudge_compat(&self, id: SheetId) {
        if !self.has_shady_css {
            return;
        }
        let location = self.compat.borrow().get(id);
        if let Some(location) = location {
            location.nudge();
        }
    }
}

/// Decorate one original rule method with the fan-out/log policy. Pure with
/// respect to the original: unregistered receivers and engine failures leave
/// it indistinguishable from the undecorated method.
pub(crate) fn wrap(original: RuleMethod, ctx: InterceptContext) -> RuleMethod {
    Rc::new(move |sheet: &CssStyleSheet, op: &SheetOp| {
        let outcome = original(sheet, op)?;

        let adopters: Option<SmallVec<StyleElement, 4>> = ctx
            .registry
            .borrow()
            .get(sheet)
            .map(|record| record.adopters.clone());
        let Some(adopters) = adopters else {
            return Ok(outcome);
        };

        for adopter in &adopters {
            // Adopters without a live sheet are skipped, not an error.
            if let Some(target) = adopter.sheet() {
                target.apply(op)?;
            }
        }
        ctx.nudge_compat(sheet.id());
        if let Some(record) = ctx.registry.borrow_mut().get_mut(sheet) {
            record.actions.push(op.clone());
        }
        debug!(
            "replayed {} onto {} adopter(s) of {:?}",
            op.method_name(),
            adopters.len(),
            sheet.id()
        );

        Ok(outcome)
    })
}

/// Install the wrappers and the two replacement methods onto a document's
/// prototype. Called exactly once per environment, before any construction.
pub(crate) fn update_prototype(prototype: &Rc<RefCell<SheetPrototype>>, ctx: &InterceptContext) {
    for name in SheetOp::METHOD_NAMES {
        let original = prototype.borrow().method(name);
        if let Some(original) = original {
            prototype
                .borrow_mut()
                .set_method(name, wrap(original, ctx.clone()));
        }
    }
    prototype.borrow_mut().set_replace(make_replace(ctx.clone()));
    prototype
        .borrow_mut()
        .set_replace_sync(make_replace_sync(ctx.clone()));
}
