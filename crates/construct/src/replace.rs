//! Whole-content replacement: `replace` (deferred) and `replaceSync`
//! (inline). Snapshot propagation, not a logged operation; the action log
//! is left untouched.

use crate::error::ReplaceError;
use crate::intercept::InterceptContext;
use anyhow::{Error, anyhow};
use dom::syntax;
use dom::{CssStyleSheet, ReplaceMethod, ReplaceSyncMethod, StyleElement};
use futures::future;
use smallvec::SmallVec;
use std::rc::Rc;

pub(crate) fn make_replace(ctx: InterceptContext) -> ReplaceMethod {
    Rc::new(move |sheet: &CssStyleSheet, contents: String| {
        // Validate, apply, and propagate without yielding; the deferred
        // result completes exactly once, already resolved.
        let result = perform_replace(&ctx, sheet, &contents, "replace", false);
        Box::pin(future::ready(result))
    })
}

pub(crate) fn make_replace_sync(ctx: InterceptContext) -> ReplaceSyncMethod {
    Rc::new(move |sheet: &CssStyleSheet, contents: String| {
        perform_replace(&ctx, sheet, &contents, "replaceSync", true)
    })
}

fn perform_replace(
    ctx: &InterceptContext,
    sheet: &CssStyleSheet,
    contents: &str,
    method: &'static str,
    sync: bool,
) -> Result<CssStyleSheet, Error> {
    // Synchronous import resolution is unsupported; reject before touching
    // any state.
    if sync && syntax::contains_import(contents) {
        return Err(Error::new(ReplaceError::ImportNotAllowed));
    }

    let parts: Option<(StyleElement, SmallVec<StyleElement, 4>)> = ctx
        .registry
        .borrow()
        .get(sheet)
        .map(|record| (record.backing_element.clone(), record.adopters.clone()));
    let Some((backing, adopters)) = parts else {
        return Err(Error::new(ReplaceError::NotConstructed { method }));
    };

    backing.set_css_text(contents);
    let snapshot = backing.css_text();
    for adopter in &adopters {
        adopter.set_css_text(&snapshot);
    }
    ctx.nudge_compat(sheet.id());

    backing
        .sheet()
        .ok_or_else(|| anyhow!("backing element lost its stylesheet during {method}"))
}
