//! Compiles strategy definitions into parsed scripts ready for the interpreter.
//!
//! Structured conditions bind each input as `input_<i>` (indicator outputs
//! through generated statements, literal values as scalar constants) and
//! compare them into the `condition` result.

use crate::indicators::registry::IndicatorRegistry;
use crate::models::context::MarketContext;
use crate::models::script::{ConditionStatement, IndicatorStatement, ParsedScript};
use crate::models::strategy::{ConditionInput, StrategyDefinition, StructuredCondition};
use crate::script::parser::parse_script;
use serde_json::Value as JsonValue;

pub const CONDITION_OUTPUT: &str = "condition";
pub const DEFAULT_SOURCE: &str = "close";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error("structured condition needs exactly 2 inputs, got {found}")]
    InputCount { found: usize },

    #[error("unknown indicator '{name}'")]
    UnknownIndicator { name: String },

    #[error("indicator '{indicator}' parameter '{param}': {reason}")]
    InvalidParam {
        indicator: String,
        param: String,
        reason: String,
    },
}

/// Strategy in evaluable form
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStrategy {
    pub script: ParsedScript,
    /// Scalars seeded into every evaluation context
    pub constants: Vec<(String, f64)>,
    /// Context name the signal policy should watch instead of its default
    pub signal_source: Option<String>,
}

impl CompiledStrategy {
    pub fn compile(
        definition: &StrategyDefinition,
        registry: &IndicatorRegistry,
    ) -> Result<Self, StrategyError> {
        match definition {
            StrategyDefinition::Script(text) => Ok(Self {
                script: parse_script(text),
                constants: Vec::new(),
                signal_source: None,
            }),
            StrategyDefinition::Structured(structured) => {
                compile_condition(&structured.condition, registry)
            }
        }
    }

    /// Seed the strategy's constants into a context built from market data.
    pub fn prepare_context(&self, mut context: MarketContext) -> MarketContext {
        for (name, value) in &self.constants {
            context = context.with_scalar(name, *value);
        }
        context
    }
}

pub fn compile_condition(
    condition: &StructuredCondition,
    registry: &IndicatorRegistry,
) -> Result<CompiledStrategy, StrategyError> {
    if condition.inputs.len() != 2 {
        return Err(StrategyError::InputCount {
            found: condition.inputs.len(),
        });
    }

    let mut script = ParsedScript::default();
    let mut constants = Vec::new();
    let mut signal_source = None;

    for (i, input) in condition.inputs.iter().enumerate() {
        let output = format!("input_{}", i);
        match input {
            ConditionInput::Indicator { name, params } => {
                let descriptor =
                    registry
                        .get(name)
                        .ok_or_else(|| StrategyError::UnknownIndicator {
                            name: name.clone(),
                        })?;

                for key in params.keys() {
                    if key != "source" && descriptor.param_position(key).is_none() {
                        return Err(StrategyError::InvalidParam {
                            indicator: name.clone(),
                            param: key.clone(),
                            reason: "unknown parameter".to_string(),
                        });
                    }
                }

                let source = match params.get("source") {
                    Some(value) => param_token(name, "source", value)?,
                    None => DEFAULT_SOURCE.to_string(),
                };
                let mut args = vec![source];
                for spec in descriptor.params {
                    let token = match params.get(spec.name) {
                        Some(value) => param_token(name, spec.name, value)?,
                        None => spec.default.to_string(),
                    };
                    args.push(token);
                }

                script.indicator_statements.push(IndicatorStatement {
                    output: output.clone(),
                    function: name.clone(),
                    args,
                    line: script.indicator_statements.len() + 1,
                });
                if signal_source.is_none() {
                    signal_source = Some(output);
                }
            }
            ConditionInput::Value { value } => constants.push((output, *value)),
        }
    }

    script.condition_statements.push(ConditionStatement {
        output: CONDITION_OUTPUT.to_string(),
        lhs: "input_0".to_string(),
        operator: condition.operator,
        rhs: "input_1".to_string(),
        line: script.indicator_statements.len() + 1,
    });

    Ok(CompiledStrategy {
        script,
        constants,
        signal_source,
    })
}

fn param_token(indicator: &str, param: &str, value: &JsonValue) -> Result<String, StrategyError> {
    match value {
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        other => Err(StrategyError::InvalidParam {
            indicator: indicator.to_string(),
            param: param.to_string(),
            reason: format!("expected a number or name, got {}", other),
        }),
    }
}
