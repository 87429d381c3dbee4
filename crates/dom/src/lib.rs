//! In-memory model of a native styling engine: documents, style elements,
//! and native stylesheet objects with engine-defined rule operations.
//!
//! The engine cannot construct detached stylesheet objects on its own; a
//! sheet only exists once a style element is attached somewhere in a
//! [`Document`]. Every method call on a [`CssStyleSheet`] routes through the
//! document's [`SheetPrototype`] dispatch table, which is the seam the
//! constructible-stylesheet layer instruments.

mod document;
mod element;
mod op;
mod prototype;
mod sheet;
pub mod syntax;

pub use document::Document;
pub use element::StyleElement;
pub use op::{OpOutcome, SheetOp};
pub use prototype::{ReplaceMethod, ReplaceSyncMethod, RuleMethod, SheetPrototype};
pub use sheet::{CssRule, CssStyleSheet, SheetId};
