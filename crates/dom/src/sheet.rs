//! Native stylesheet objects: identity, rule storage, and the engine's
//! original rule operations. All calls route through the document's
//! [`SheetPrototype`] so installed wrappers apply uniformly.

use crate::op::{OpOutcome, SheetOp};
use crate::prototype::{RuleMethod, SheetPrototype};
use crate::syntax;
use anyhow::{Error, anyhow, bail};
use futures::future::{self, LocalBoxFuture};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a native stylesheet object. All registry keys
/// and identity checks use this, never rule content.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SheetId(u64);

impl SheetId {
    fn next() -> Self {
        Self(NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single rule as the engine stores it: raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CssRule {
    pub text: String,
}

impl CssRule {
    pub fn is_import(&self) -> bool {
        self.text.trim_start().starts_with("@import")
    }
}

struct SheetInner {
    id: SheetId,
    rules: Vec<CssRule>,
    prototype: Weak<RefCell<SheetPrototype>>,
}

/// Cheap-clone handle to a native stylesheet object. Equality is object
/// identity, matching how the engine compares sheets.
#[derive(Clone)]
pub struct CssStyleSheet {
    inner: Rc<RefCell<SheetInner>>,
}

impl PartialEq for CssStyleSheet {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for CssStyleSheet {}

impl fmt::Debug for CssStyleSheet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        formatter
            .debug_struct("CssStyleSheet")
            .field("id", &inner.id)
            .field("rules", &inner.rules.len())
            .finish()
    }
}

impl CssStyleSheet {
    pub(crate) fn new(prototype: Weak<RefCell<SheetPrototype>>, css_text: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SheetInner {
                id: SheetId::next(),
                rules: derive_rules(css_text),
                prototype,
            })),
        }
    }

    pub fn id(&self) -> SheetId {
        self.inner.borrow().id
    }

    /// Current rule list, in order.
    pub fn rules(&self) -> Vec<CssRule> {
        self.inner.borrow().rules.clone()
    }

    /// Rule texts only; convenient for assertions.
    pub fn rule_texts(&self) -> Vec<String> {
        self.inner
            .borrow()
            .rules
            .iter()
            .map(|rule| rule.text.clone())
            .collect()
    }

    /// Re-derive the rule list from a full stylesheet text. The engine does
    /// this whenever the owning element's css text is assigned.
    pub(crate) fn reset_rules(&self, css_text: &str) {
        self.inner.borrow_mut().rules = derive_rules(css_text);
    }

    fn prototype(&self) -> Option<Rc<RefCell<SheetPrototype>>> {
        self.inner.borrow().prototype.upgrade()
    }

    fn rule_method(&self, name: &str) -> Option<RuleMethod> {
        let prototype = self.prototype()?;
        let method = prototype.borrow().method(name);
        method
    }

    /// Dispatch a rule operation through the prototype table, falling back to
    /// the original engine behavior if no slot is installed.
    pub fn apply(&self, op: &SheetOp) -> Result<OpOutcome, Error> {
        match self.rule_method(op.method_name()) {
            Some(method) => method(self, op),
            None => op.apply_native(self),
        }
    }

    pub fn insert_rule(&self, rule: &str, index: usize) -> Result<usize, Error> {
        let op = SheetOp::InsertRule {
            rule: rule.to_owned(),
            index,
        };
        match self.apply(&op)? {
            OpOutcome::Index(at) => Ok(at),
            outcome => bail!("insertRule produced an unexpected outcome: {outcome:?}"),
        }
    }

    pub fn delete_rule(&self, index: usize) -> Result<(), Error> {
        self.apply(&SheetOp::DeleteRule { index }).map(|_| ())
    }

    pub fn add_rule(
        &self,
        selector: &str,
        block: &str,
        index: Option<usize>,
    ) -> Result<i32, Error> {
        let op = SheetOp::AddRule {
            selector: selector.to_owned(),
            block: block.to_owned(),
            index,
        };
        match self.apply(&op)? {
            OpOutcome::LegacyIndex(value) => Ok(value),
            outcome => bail!("addRule produced an unexpected outcome: {outcome:?}"),
        }
    }

    pub fn remove_rule(&self, index: usize) -> Result<(), Error> {
        self.apply(&SheetOp::RemoveRule { index }).map(|_| ())
    }

    pub fn add_import(&self, url: &str, index: Option<usize>) -> Result<usize, Error> {
        let op = SheetOp::AddImport {
            url: url.to_owned(),
            index,
        };
        match self.apply(&op)? {
            OpOutcome::Index(at) => Ok(at),
            outcome => bail!("addImport produced an unexpected outcome: {outcome:?}"),
        }
    }

    pub fn remove_import(&self, index: usize) -> Result<(), Error> {
        self.apply(&SheetOp::RemoveImport { index }).map(|_| ())
    }

    pub fn add_page_rule(
        &self,
        selector: &str,
        block: &str,
        index: Option<usize>,
    ) -> Result<usize, Error> {
        let op = SheetOp::AddPageRule {
            selector: selector.to_owned(),
            block: block.to_owned(),
            index,
        };
        match self.apply(&op)? {
            OpOutcome::Index(at) => Ok(at),
            outcome => bail!("addPageRule produced an unexpected outcome: {outcome:?}"),
        }
    }

    /// Whole-content replacement; a slot only present once the constructible
    /// stylesheet layer has been installed on this document.
    pub fn replace(&self, contents: &str) -> LocalBoxFuture<'static, Result<Self, Error>> {
        let slot = self
            .prototype()
            .and_then(|prototype| prototype.borrow().replace_method());
        match slot {
            Some(method) => method(self, contents.to_owned()),
            None => Box::pin(future::ready(Err(anyhow!(
                "replace is not installed on this document's stylesheet prototype"
            )))),
        }
    }

    /// Synchronous counterpart of [`CssStyleSheet::replace`].
    pub fn replace_sync(&self, contents: &str) -> Result<Self, Error> {
        let slot = self
            .prototype()
            .and_then(|prototype| prototype.borrow().replace_sync_method());
        match slot {
            Some(method) => method(self, contents.to_owned()),
            None => Err(anyhow!(
                "replaceSync is not installed on this document's stylesheet prototype"
            )),
        }
    }

    pub(crate) fn native_insert_rule(&self, rule: &str, index: usize) -> Result<usize, Error> {
        let mut inner = self.inner.borrow_mut();
        let max = inner.rules.len();
        if index > max {
            bail!(
                "Failed to execute 'insertRule' on 'CSSStyleSheet': The index provided ({index}) is larger than the maximum index ({max})."
            );
        }
        inner.rules.insert(
            index,
            CssRule {
                text: rule.trim().to_owned(),
            },
        );
        Ok(index)
    }

    pub(crate) fn native_delete_rule(&self, index: usize) -> Result<(), Error> {
        let mut inner = self.inner.borrow_mut();
        if index >= inner.rules.len() {
            bail!(
                "Failed to execute 'deleteRule' on 'CSSStyleSheet': The index provided ({index}) is larger than the maximum index ({}).",
                inner.rules.len().saturating_sub(1)
            );
        }
        inner.rules.remove(index);
        Ok(())
    }

    pub(crate) fn native_add_rule(
        &self,
        selector: &str,
        block: &str,
        index: Option<usize>,
    ) -> Result<i32, Error> {
        let mut inner = self.inner.borrow_mut();
        let max = inner.rules.len();
        let at = index.unwrap_or(max);
        if at > max {
            bail!(
                "Failed to execute 'addRule' on 'CSSStyleSheet': The index provided ({at}) is larger than the maximum index ({max})."
            );
        }
        inner.rules.insert(
            at,
            CssRule {
                text: format!("{selector} {{ {block} }}"),
            },
        );
        // The legacy method always reports -1.
        Ok(-1)
    }

    pub(crate) fn native_add_import(&self, url: &str, index: Option<usize>) -> Result<usize, Error> {
        let mut inner = self.inner.borrow_mut();
        let import_end = inner.rules.iter().take_while(|rule| rule.is_import()).count();
        let at = index.unwrap_or(import_end);
        if at > import_end {
            bail!(
                "Failed to execute 'addImport' on 'CSSStyleSheet': The index provided ({at}) is larger than the maximum index ({import_end})."
            );
        }
        inner.rules.insert(
            at,
            CssRule {
                text: format!("@import url(\"{url}\");"),
            },
        );
        Ok(at)
    }

    pub(crate) fn native_remove_import(&self, index: usize) -> Result<(), Error> {
        let mut inner = self.inner.borrow_mut();
        let is_import = inner.rules.get(index).map(CssRule::is_import);
        match is_import {
            Some(true) => {
                inner.rules.remove(index);
                Ok(())
            }
            Some(false) => bail!(
                "Failed to execute 'removeImport' on 'CSSStyleSheet': The index provided ({index}) does not identify an @import rule."
            ),
            None => bail!(
                "Failed to execute 'removeImport' on 'CSSStyleSheet': The index provided ({index}) is larger than the maximum index ({}).",
                inner.rules.len().saturating_sub(1)
            ),
        }
    }

    pub(crate) fn native_add_page_rule(
        &self,
        selector: &str,
        block: &str,
        index: Option<usize>,
    ) -> Result<usize, Error> {
        let mut inner = self.inner.borrow_mut();
        let max = inner.rules.len();
        let at = index.unwrap_or(max);
        if at > max {
            bail!(
                "Failed to execute 'addPageRule' on 'CSSStyleSheet': The index provided ({at}) is larger than the maximum index ({max})."
            );
        }
        let text = if selector.is_empty() {
            format!("@page {{ {block} }}")
        } else {
            format!("@page {selector} {{ {block} }}")
        };
        inner.rules.insert(at, CssRule { text });
        Ok(at)
    }
}

fn derive_rules(css_text: &str) -> Vec<CssRule> {
    syntax::split_rules(css_text)
        .into_iter()
        .map(|text| CssRule { text })
        .collect()
}
