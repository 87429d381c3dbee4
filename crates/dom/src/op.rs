//! Mutating stylesheet operations modeled as data, so a single value can
//! flow through native dispatch, adopter replay, and the action log.

use crate::sheet::CssStyleSheet;
use anyhow::Error;
use serde::{Deserialize, Serialize};

/// One mutating rule operation with its full argument list.
///
/// Variants mirror the engine's native method surface; `method_name` yields
/// the engine-facing camel-case name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum SheetOp {
    AddImport {
        url: String,
        index: Option<usize>,
    },
    AddPageRule {
        selector: String,
        block: String,
        index: Option<usize>,
    },
    AddRule {
        selector: String,
        block: String,
        index: Option<usize>,
    },
    DeleteRule {
        index: usize,
    },
    InsertRule {
        rule: String,
        index: usize,
    },
    RemoveImport {
        index: usize,
    },
    RemoveRule {
        index: usize,
    },
}

/// Engine-defined return value of a rule operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpOutcome {
    /// Index the rule landed at (`insertRule`, `addImport`, `addPageRule`).
    Index(usize),
    /// The legacy `addRule` result, always `-1`.
    LegacyIndex(i32),
    /// No return value (`deleteRule`, `removeRule`, `removeImport`).
    None,
}

impl SheetOp {
    /// Every native method name the interception layer wraps.
    pub const METHOD_NAMES: [&'static str; 7] = [
        "addImport",
        "addPageRule",
        "addRule",
        "deleteRule",
        "insertRule",
        "removeImport",
        "removeRule",
    ];

    /// The engine-facing name of this operation.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::AddImport { .. } => "addImport",
            Self::AddPageRule { .. } => "addPageRule",
            Self::AddRule { .. } => "addRule",
            Self::DeleteRule { .. } => "deleteRule",
            Self::InsertRule { .. } => "insertRule",
            Self::RemoveImport { .. } => "removeImport",
            Self::RemoveRule { .. } => "removeRule",
        }
    }

    /// Apply this operation with the engine's original behavior, bypassing
    /// whatever is installed on the prototype.
    pub fn apply_native(&self, sheet: &CssStyleSheet) -> Result<OpOutcome, Error> {
        match self {
            Self::AddImport { url, index } => {
                sheet.native_add_import(url, *index).map(OpOutcome::Index)
            }
            Self::AddPageRule {
                selector,
                block,
                index,
            } => sheet
                .native_add_page_rule(selector, block, *index)
                .map(OpOutcome::Index),
            Self::AddRule {
                selector,
                block,
                index,
            } => sheet
                .native_add_rule(selector, block, *index)
                .map(OpOutcome::LegacyIndex),
            Self::DeleteRule { index } => {
                sheet.native_delete_rule(*index).map(|()| OpOutcome::None)
            }
            Self::InsertRule { rule, index } => {
                sheet.native_insert_rule(rule, *index).map(OpOutcome::Index)
            }
            Self::RemoveImport { index } => {
                sheet.native_remove_import(*index).map(|()| OpOutcome::None)
            }
            Self::RemoveRule { index } => {
                sheet.native_delete_rule(*index).map(|()| OpOutcome::None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SheetOp;

    #[test]
    fn method_names_match_the_enumerated_surface() {
        let op = SheetOp::InsertRule {
            rule: "a { color: red }".into(),
            index: 0,
        };
        assert_eq!(op.method_name(), "insertRule");
        assert!(SheetOp::METHOD_NAMES.contains(&op.method_name()));
    }

    #[test]
    fn serializes_with_engine_facing_method_tag() {
        let op = SheetOp::DeleteRule { index: 2 };
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains("\"method\":\"deleteRule\""), "got {json}");
    }
}
