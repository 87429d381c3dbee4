use std::error::Error as StdError;
use std::fmt;

/// Failures of the content-replacement protocol. Family-A rule operations
/// never produce these; their engine-level errors propagate unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplaceError {
    /// `replace`/`replaceSync` called on a sheet that never went through the
    /// construction path.
    NotConstructed { method: &'static str },
    /// `replaceSync` contents carried an `@import` directive; synchronous
    /// import resolution is unsupported.
    ImportNotAllowed,
}

impl fmt::Display for ReplaceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConstructed { method } => write!(
                formatter,
                "Failed to execute '{method}' on 'CSSStyleSheet': Can't call {method} on non-constructed CSSStyleSheets."
            ),
            Self::ImportNotAllowed => write!(
                formatter,
                "@import rules are not allowed when creating stylesheet synchronously"
            ),
        }
    }
}

impl StdError for ReplaceError {}
