//! Constructible, shareable stylesheets for an engine that cannot build
//! detached stylesheet objects natively.
//!
//! A [`SheetRuntime`] owns the registry for one [`dom::Document`]. After
//! [`SheetRuntime::install`] instruments the document's stylesheet
//! prototype, [`SheetRuntime::construct`] hands out native sheet objects
//! whose mutations fan out to every adopter automatically:
//!
//! - rule mutations (`insertRule`, `deleteRule`, the legacy `addRule`
//!   family) are applied natively, replayed onto each adopter's own sheet,
//!   and appended to the sheet's action log for late-adopter catch-up;
//! - whole-content replacement (`replace`/`replaceSync`) rewrites the
//!   backing element and snapshots its text onto every adopter, bypassing
//!   the log;
//! - environments carrying a legacy style-scoping layer get a re-assignment
//!   nudge on their [`CompatLocation`] after every change.
//!
//! Constructed sheets are ordinary [`dom::CssStyleSheet`] objects; they are
//! distinguished only by registry membership, which is what
//! [`SheetRuntime::is_constructed_stylesheet`] checks.

mod compat;
mod error;
mod intercept;
mod registry;
mod replace;
mod runtime;

pub use compat::CompatLocation;
pub use error::ReplaceError;
pub use registry::{CompatRegistry, SheetRecord, SheetRegistry};
pub use runtime::SheetRuntime;
