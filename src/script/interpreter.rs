//! Two-phase script evaluation: indicators in declaration order, then conditions.
//!
//! Conditions run after every indicator but only see outputs declared on an
//! earlier line. A name bound by a later indicator resolves to whatever it held
//! before that binding, if anything.

use crate::indicators::registry::IndicatorRegistry;
use crate::models::context::MarketContext;
use crate::models::script::{ConditionStatement, IndicatorStatement, ParsedScript};
use crate::models::value::{Argument, Value};
use crate::script::diagnostic::Diagnostic;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    /// Condition name → result. Skipped statements have no key.
    pub conditions: BTreeMap<String, bool>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

/// First successful binding of an indicator output within one pass
struct Declaration {
    line: usize,
    shadowed: Option<Value>,
}

#[derive(Default)]
struct Declarations(HashMap<String, Declaration>);

impl Declarations {
    fn record(&mut self, statement: &IndicatorStatement, shadowed: Option<Value>) {
        self.0
            .entry(statement.output.clone())
            .or_insert(Declaration {
                line: statement.line,
                shadowed,
            });
    }

    /// Value of `token` as seen from `statement`'s line.
    fn visible<'a>(
        &'a self,
        statement: &ConditionStatement,
        token: &str,
        context: &'a MarketContext,
    ) -> Option<&'a Value> {
        match self.0.get(token) {
            // unpositioned statements (line 0) see everything
            Some(declared) if statement.line > 0 && declared.line > statement.line => {
                declared.shadowed.as_ref()
            }
            _ => context.get(token),
        }
    }
}

#[derive(Clone)]
pub struct Interpreter {
    registry: Arc<IndicatorRegistry>,
}

impl Interpreter {
    pub fn new(registry: Arc<IndicatorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    /// Evaluate `script` against `context`.
    ///
    /// Indicator outputs are bound into `context`, so callers pass a working
    /// copy when the original must stay untouched.
    pub fn evaluate(&self, script: &ParsedScript, context: &mut MarketContext) -> Evaluation {
        let mut evaluation = Evaluation::default();

        let mut declarations = Declarations::default();

        for statement in &script.indicator_statements {
            let shadowed = context.get(&statement.output).cloned();
            match self.run_indicator(statement, context) {
                Ok(()) => declarations.record(statement, shadowed),
                Err(diagnostic) => {
                    warn!(diagnostic = %diagnostic, "skipping indicator statement");
                    evaluation.diagnostics.push(diagnostic);
                }
            }
        }

        for statement in &script.condition_statements {
            match Self::run_condition(statement, context, &declarations) {
                Ok(result) => {
                    evaluation.conditions.insert(statement.output.clone(), result);
                }
                Err(diagnostic) => {
                    warn!(diagnostic = %diagnostic, "skipping condition statement");
                    evaluation.diagnostics.push(diagnostic);
                }
            }
        }

        evaluation
    }

    fn run_indicator(
        &self,
        statement: &IndicatorStatement,
        context: &mut MarketContext,
    ) -> Result<(), Diagnostic> {
        let descriptor =
            self.registry
                .get(&statement.function)
                .ok_or_else(|| Diagnostic::UnknownFunction {
                    statement: statement.output.clone(),
                    function: statement.function.clone(),
                })?;

        let args: Vec<Argument> = statement
            .args
            .iter()
            .map(|token| match context.get(token) {
                Some(value) => Argument::Bound(value.clone()),
                None => Argument::literal(token),
            })
            .collect();

        let value = descriptor
            .invoke(&args)
            .map_err(|e| Diagnostic::from_indicator(&statement.output, e))?;

        debug!(
            output = %statement.output,
            function = %statement.function,
            "bound indicator output"
        );

        context
            .bind(&statement.output, value)
            .map_err(|conflict| Diagnostic::from_conflict(&statement.output, conflict))
    }

    fn run_condition(
        statement: &ConditionStatement,
        context: &MarketContext,
        declarations: &Declarations,
    ) -> Result<bool, Diagnostic> {
        let lhs = match declarations.visible(statement, &statement.lhs, context) {
            Some(value) => Self::comparable(statement, &statement.lhs, value)?,
            None => return Err(Self::unresolved(statement, &statement.lhs)),
        };

        let rhs = match declarations.visible(statement, &statement.rhs, context) {
            Some(value) => Self::comparable(statement, &statement.rhs, value)?,
            None => statement
                .rhs
                .parse::<f64>()
                .map_err(|_| Self::unresolved(statement, &statement.rhs))?,
        };

        Ok(statement.operator.apply(lhs, rhs))
    }

    fn comparable(
        statement: &ConditionStatement,
        token: &str,
        value: &Value,
    ) -> Result<f64, Diagnostic> {
        if let Value::Tuple(_) = value {
            return Err(Diagnostic::NotComparable {
                statement: statement.output.clone(),
                token: token.to_string(),
            });
        }
        value
            .latest()
            .ok_or_else(|| Self::unresolved(statement, token))
    }

    fn unresolved(statement: &ConditionStatement, token: &str) -> Diagnostic {
        Diagnostic::UnresolvedReference {
            statement: statement.output.clone(),
            token: token.to_string(),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Arc::new(IndicatorRegistry::builtin()))
    }
}
