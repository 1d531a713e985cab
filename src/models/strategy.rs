//! Strategy inputs accepted by the supervisor

use crate::models::script::Comparison;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Either raw script text or a structured condition description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategyDefinition {
    Script(String),
    Structured(StructuredStrategy),
}

impl From<&str> for StrategyDefinition {
    fn from(script: &str) -> Self {
        StrategyDefinition::Script(script.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredStrategy {
    pub condition: StructuredCondition,
}

/// `{"operator": ">", "inputs": [lhs, rhs]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCondition {
    pub operator: Comparison,
    pub inputs: Vec<ConditionInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConditionInput {
    Indicator {
        name: String,
        #[serde(default)]
        params: HashMap<String, JsonValue>,
    },
    Value {
        value: f64,
    },
}
