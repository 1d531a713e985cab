//! Per-statement skip reasons.
//!
//! A statement that cannot be evaluated is skipped and leaves a missing key
//! in the output; the diagnostic records why.

use crate::indicators::error::IndicatorError;
use crate::models::context::KindConflict;
use crate::models::value::ValueKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("{statement}: unknown indicator function '{function}'")]
    UnknownFunction { statement: String, function: String },

    #[error("{statement}: {source}")]
    InvalidParameter {
        statement: String,
        source: IndicatorError,
    },

    #[error("{statement}: unresolved reference '{token}'")]
    UnresolvedReference { statement: String, token: String },

    #[error("{statement}: '{name}' is bound as {existing}, cannot rebind it as {attempted}")]
    KindConflict {
        statement: String,
        name: String,
        existing: ValueKind,
        attempted: ValueKind,
    },

    #[error("{statement}: '{token}' holds a multi-output value and cannot be compared")]
    NotComparable { statement: String, token: String },
}

impl Diagnostic {
    /// Output name of the statement that was skipped
    pub fn statement(&self) -> &str {
        match self {
            Diagnostic::UnknownFunction { statement, .. }
            | Diagnostic::InvalidParameter { statement, .. }
            | Diagnostic::UnresolvedReference { statement, .. }
            | Diagnostic::KindConflict { statement, .. }
            | Diagnostic::NotComparable { statement, .. } => statement,
        }
    }

    pub(crate) fn from_indicator(statement: &str, err: IndicatorError) -> Self {
        match err {
            IndicatorError::UnresolvedArgument { token, .. } => Diagnostic::UnresolvedReference {
                statement: statement.to_string(),
                token,
            },
            other => Diagnostic::InvalidParameter {
                statement: statement.to_string(),
                source: other,
            },
        }
    }

    pub(crate) fn from_conflict(statement: &str, conflict: KindConflict) -> Self {
        Diagnostic::KindConflict {
            statement: statement.to_string(),
            name: conflict.name,
            existing: conflict.existing,
            attempted: conflict.attempted,
        }
    }
}
