//! The per-document method dispatch table every stylesheet call routes
//! through. Swapping a slot here changes behavior for all sheets of the
//! document at once, which is what the interception layer relies on.

use crate::op::{OpOutcome, SheetOp};
use crate::sheet::CssStyleSheet;
use anyhow::Error;
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::rc::Rc;

/// A rule-operation slot: receiver plus the operation value.
pub type RuleMethod = Rc<dyn Fn(&CssStyleSheet, &SheetOp) -> Result<OpOutcome, Error>>;

/// The `replace` slot; the returned future completes exactly once.
pub type ReplaceMethod =
    Rc<dyn Fn(&CssStyleSheet, String) -> LocalBoxFuture<'static, Result<CssStyleSheet, Error>>>;

/// The `replaceSync` slot.
pub type ReplaceSyncMethod = Rc<dyn Fn(&CssStyleSheet, String) -> Result<CssStyleSheet, Error>>;

pub struct SheetPrototype {
    methods: HashMap<&'static str, RuleMethod>,
    replace: Option<ReplaceMethod>,
    replace_sync: Option<ReplaceSyncMethod>,
}

impl SheetPrototype {
    /// The untouched engine surface: every rule method maps to the original
    /// native behavior, and no replacement methods exist.
    pub fn native() -> Self {
        let mut methods: HashMap<&'static str, RuleMethod> = HashMap::new();
        for name in SheetOp::METHOD_NAMES {
            methods.insert(
                name,
                Rc::new(|sheet: &CssStyleSheet, op: &SheetOp| op.apply_native(sheet)),
            );
        }
        Self {
            methods,
            replace: None,
            replace_sync: None,
        }
    }

    pub fn method(&self, name: &str) -> Option<RuleMethod> {
        self.methods.get(name).map(Rc::clone)
    }

    pub fn set_method(&mut self, name: &'static str, method: RuleMethod) {
        self.methods.insert(name, method);
    }

    pub fn replace_method(&self) -> Option<ReplaceMethod> {
        self.replace.as_ref().map(Rc::clone)
    }

    pub fn set_replace(&mut self, method: ReplaceMethod) {
        self.replace = Some(method);
    }

    pub fn replace_sync_method(&self) -> Option<ReplaceSyncMethod> {
        self.replace_sync.as_ref().map(Rc::clone)
    }

    pub fn set_replace_sync(&mut self, method: ReplaceSyncMethod) {
        self.replace_sync = Some(method);
    }

    /// Whether the replacement methods have been installed.
    pub fn has_replace(&self) -> bool {
        self.replace.is_some() && self.replace_sync.is_some()
    }
}

impl Default for SheetPrototype {
    fn default() -> Self {
        Self::native()
    }
}
