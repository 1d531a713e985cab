//! Parsed strategy script data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// `output = ns.function(arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorStatement {
    pub output: String,
    pub function: String,
    /// Raw tokens: variable names or numeric literals, resolved at evaluation.
    pub args: Vec<String>,
    /// 1-based script line; 0 when parsed outside a script
    #[serde(default)]
    pub line: usize,
}

/// `output = lhs <op> rhs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionStatement {
    pub output: String,
    pub lhs: String,
    pub operator: Comparison,
    pub rhs: String,
    /// Conditions only see indicator outputs declared on earlier lines
    #[serde(default)]
    pub line: usize,
}

/// Comparison operators supported by the script grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
}

impl Comparison {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparison::GreaterThan),
            "<" => Some(Comparison::LessThan),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::GreaterThan => lhs > rhs,
            Comparison::LessThan => lhs < rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Immutable result of parsing one script. Statement order is evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedScript {
    pub indicator_statements: Vec<IndicatorStatement>,
    pub condition_statements: Vec<ConditionStatement>,
}

impl ParsedScript {
    pub fn is_empty(&self) -> bool {
        self.indicator_statements.is_empty() && self.condition_statements.is_empty()
    }

    pub fn statement_count(&self) -> usize {
        self.indicator_statements.len() + self.condition_statements.len()
    }
}
