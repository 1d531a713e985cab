//! Values bound in a market context and the arguments passed to indicators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value bound to a context name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Series(Vec<f64>),
    /// Multi-output indicator result, one series per named output.
    Tuple(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Series,
    Tuple,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => write!(f, "scalar"),
            ValueKind::Series => write!(f, "series"),
            ValueKind::Tuple => write!(f, "tuple"),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Series(_) => ValueKind::Series,
            Value::Tuple(_) => ValueKind::Tuple,
        }
    }

    /// Comparison value: a scalar itself, or the most recent sample of a series.
    /// Tuples and empty series have none.
    pub fn latest(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Series(values) => values.last().copied(),
            Value::Tuple(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Value::Series(values) => Some(values),
            _ => None,
        }
    }
}

/// A resolved indicator argument.
///
/// Tokens bound in the context resolve to their value; otherwise integer
/// and float literals are tried, and anything else is passed through as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Bound(Value),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Argument {
    pub fn literal(token: &str) -> Self {
        if let Ok(i) = token.parse::<i64>() {
            Argument::Integer(i)
        } else if let Ok(f) = token.parse::<f64>() {
            Argument::Float(f)
        } else {
            Argument::Text(token.to_string())
        }
    }
}
