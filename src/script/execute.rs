//! One-shot script execution without a supervising loop

use crate::models::context::MarketContext;
use crate::models::value::Value;
use crate::script::interpreter::Interpreter;
use crate::script::parser::parse_script;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionValue {
    Value(Value),
    Condition(bool),
}

/// Every indicator output and condition result of a single pass.
///
/// Serializes as one flat object of name → value. Diagnostics are logged
/// during evaluation and stay out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionOutput {
    #[serde(flatten)]
    pub results: BTreeMap<String, ExecutionValue>,
    #[serde(skip)]
    pub diagnostics: Vec<String>,
}

/// Parse and evaluate `text` against raw named series.
pub fn execute_script(text: &str, market_data: HashMap<String, Vec<f64>>) -> ExecutionOutput {
    execute_with(&Interpreter::default(), text, market_data)
}

pub fn execute_with(
    interpreter: &Interpreter,
    text: &str,
    market_data: HashMap<String, Vec<f64>>,
) -> ExecutionOutput {
    let script = parse_script(text);
    let input = MarketContext::from_series(market_data);
    let mut working = input.clone();
    let evaluation = interpreter.evaluate(&script, &mut working);

    let mut results = BTreeMap::new();
    for statement in &script.indicator_statements {
        let Some(value) = working.get(&statement.output) else {
            continue;
        };
        if input.get(&statement.output) != Some(value) {
            results.insert(
                statement.output.clone(),
                ExecutionValue::Value(value.clone()),
            );
        }
    }
    for (name, result) in evaluation.conditions {
        results.insert(name, ExecutionValue::Condition(result));
    }

    ExecutionOutput {
        results,
        diagnostics: evaluation
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}
