//! Indicator registry: function name → descriptor with arity and output shape

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{macd, rsi};
use crate::indicators::trend::{ema, sma};
use crate::indicators::volatility::bollinger;
use crate::models::script::ParsedScript;
use crate::models::value::{Argument, Value};
use crate::script::diagnostic::Diagnostic;
use std::collections::HashMap;

/// Shape of an indicator's return value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Single,
    /// Fixed-size tuple of named output series
    Tuple(&'static [&'static str]),
}

/// How a numeric parameter is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Whole, positive window length
    Period,
    /// Any finite positive number
    Factor,
}

/// Numeric parameter following the input series, with its default
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f64,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn period(name: &'static str, default: usize) -> Self {
        Self {
            name,
            default: default as f64,
            kind: ParamKind::Period,
        }
    }

    pub const fn factor(name: &'static str, default: f64) -> Self {
        Self {
            name,
            default,
            kind: ParamKind::Factor,
        }
    }
}

/// Params arrive coerced and in declaration order; `Period` values are whole.
pub type ComputeFn = fn(&[f64], &[f64]) -> Result<Value, IndicatorError>;

/// Tagged indicator function: first argument is always the input series,
/// followed by up to `params.len()` numeric parameters.
#[derive(Clone)]
pub struct IndicatorDescriptor {
    pub name: &'static str,
    pub params: &'static [ParamSpec],
    pub shape: OutputShape,
    compute: ComputeFn,
}

impl std::fmt::Debug for IndicatorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("shape", &self.shape)
            .finish()
    }
}

impl IndicatorDescriptor {
    pub fn new(
        name: &'static str,
        params: &'static [ParamSpec],
        shape: OutputShape,
        compute: ComputeFn,
    ) -> Self {
        Self {
            name,
            params,
            shape,
            compute,
        }
    }

    pub fn max_args(&self) -> usize {
        1 + self.params.len()
    }

    pub fn output_count(&self) -> usize {
        match self.shape {
            OutputShape::Single => 1,
            OutputShape::Tuple(names) => names.len(),
        }
    }

    /// Position of a named parameter, counting the input series as argument 0
    pub fn param_position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name).map(|i| i + 1)
    }

    /// Coerce resolved arguments and run the indicator.
    pub fn invoke(&self, args: &[Argument]) -> Result<Value, IndicatorError> {
        if args.len() > self.max_args() {
            return Err(IndicatorError::invalid(
                self.name,
                format!(
                    "accepts at most {} arguments, got {}",
                    self.max_args(),
                    args.len()
                ),
            ));
        }

        let series = match args.first() {
            Some(Argument::Bound(Value::Series(series))) => series.as_slice(),
            Some(Argument::Text(token)) => {
                return Err(IndicatorError::UnresolvedArgument {
                    indicator: self.name.to_string(),
                    token: token.clone(),
                })
            }
            Some(Argument::Bound(other)) => {
                return Err(IndicatorError::invalid(
                    self.name,
                    format!("input must be a series, got a {}", other.kind()),
                ))
            }
            Some(Argument::Integer(_)) | Some(Argument::Float(_)) => {
                return Err(IndicatorError::invalid(
                    self.name,
                    "input must be a series, got a numeric literal",
                ))
            }
            None => {
                return Err(IndicatorError::invalid(
                    self.name,
                    "missing required input series",
                ))
            }
        };

        let mut params = Vec::with_capacity(self.params.len());
        for (i, spec) in self.params.iter().enumerate() {
            let value = match args.get(i + 1) {
                Some(arg) => self.coerce_param(spec, arg)?,
                None => spec.default,
            };
            params.push(value);
        }

        (self.compute)(series, &params)
    }

    fn coerce_param(&self, spec: &ParamSpec, arg: &Argument) -> Result<f64, IndicatorError> {
        let number = match arg {
            Argument::Integer(i) => *i as f64,
            Argument::Float(f) => *f,
            Argument::Bound(Value::Scalar(f)) => *f,
            Argument::Bound(other) => {
                return Err(IndicatorError::invalid(
                    self.name,
                    format!("{} must be a number, got a {}", spec.name, other.kind()),
                ))
            }
            Argument::Text(token) => {
                return Err(IndicatorError::UnresolvedArgument {
                    indicator: self.name.to_string(),
                    token: token.clone(),
                })
            }
        };

        if !number.is_finite() {
            return Err(IndicatorError::invalid(
                self.name,
                format!("{} must be finite, got {}", spec.name, number),
            ));
        }
        if spec.kind == ParamKind::Period && number.fract() != 0.0 {
            return Err(IndicatorError::invalid(
                self.name,
                format!("{} must be a whole number, got {}", spec.name, number),
            ));
        }
        if number <= 0.0 {
            return Err(IndicatorError::invalid(
                self.name,
                format!("{} must be positive, got {}", spec.name, number),
            ));
        }

        Ok(number)
    }
}

const RSI_PARAMS: &[ParamSpec] = &[ParamSpec::period("period", rsi::DEFAULT_RSI_PERIOD)];

const MACD_PARAMS: &[ParamSpec] = &[
    ParamSpec::period("fast", macd::DEFAULT_FAST_PERIOD),
    ParamSpec::period("slow", macd::DEFAULT_SLOW_PERIOD),
    ParamSpec::period("signal", macd::DEFAULT_SIGNAL_PERIOD),
];

const EMA_PARAMS: &[ParamSpec] = &[ParamSpec::period("span", ema::DEFAULT_EMA_SPAN)];

const SMA_PARAMS: &[ParamSpec] = &[ParamSpec::period("period", sma::DEFAULT_SMA_PERIOD)];

const BB_PARAMS: &[ParamSpec] = &[
    ParamSpec::period("period", bollinger::DEFAULT_BB_PERIOD),
    ParamSpec::factor("mult", bollinger::DEFAULT_BB_MULTIPLIER),
];

fn compute_rsi(series: &[f64], params: &[f64]) -> Result<Value, IndicatorError> {
    rsi::calculate_rsi(series, params[0] as usize).map(Value::Series)
}

fn compute_macd(series: &[f64], params: &[f64]) -> Result<Value, IndicatorError> {
    let out = macd::calculate_macd(
        series,
        params[0] as usize,
        params[1] as usize,
        params[2] as usize,
    )?;
    Ok(Value::Tuple(vec![out.macd, out.signal, out.histogram]))
}

fn compute_ema(series: &[f64], params: &[f64]) -> Result<Value, IndicatorError> {
    ema::calculate_ema(series, params[0] as usize).map(Value::Series)
}

fn compute_sma(series: &[f64], params: &[f64]) -> Result<Value, IndicatorError> {
    sma::calculate_sma(series, params[0] as usize).map(Value::Series)
}

fn compute_bb(series: &[f64], params: &[f64]) -> Result<Value, IndicatorError> {
    let out = bollinger::calculate_bollinger_bands(series, params[0] as usize, params[1])?;
    Ok(Value::Tuple(vec![out.upper, out.middle, out.lower]))
}

/// Lookup table for indicator dispatch by function name
#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    entries: HashMap<String, IndicatorDescriptor>,
}

impl IndicatorRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry with the built-in indicators (rsi, macd, ema, sma, bb)
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(IndicatorDescriptor::new(
            "rsi",
            RSI_PARAMS,
            OutputShape::Single,
            compute_rsi,
        ));
        registry.register(IndicatorDescriptor::new(
            "macd",
            MACD_PARAMS,
            OutputShape::Tuple(&["macd", "signal", "histogram"]),
            compute_macd,
        ));
        registry.register(IndicatorDescriptor::new(
            "ema",
            EMA_PARAMS,
            OutputShape::Single,
            compute_ema,
        ));
        registry.register(IndicatorDescriptor::new(
            "sma",
            SMA_PARAMS,
            OutputShape::Single,
            compute_sma,
        ));
        registry.register(IndicatorDescriptor::new(
            "bb",
            BB_PARAMS,
            OutputShape::Tuple(&["upper", "middle", "lower"]),
            compute_bb,
        ));
        registry
    }

    pub fn register(&mut self, descriptor: IndicatorDescriptor) {
        self.entries.insert(descriptor.name.to_string(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorDescriptor> {
        self.entries.get(name)
    }

    /// Registered function names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check indicator statements against the registry before evaluation.
    pub fn validate(&self, script: &ParsedScript) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for statement in &script.indicator_statements {
            let Some(descriptor) = self.get(&statement.function) else {
                diagnostics.push(Diagnostic::UnknownFunction {
                    statement: statement.output.clone(),
                    function: statement.function.clone(),
                });
                continue;
            };

            if statement.args.is_empty() || statement.args.len() > descriptor.max_args() {
                diagnostics.push(Diagnostic::InvalidParameter {
                    statement: statement.output.clone(),
                    source: IndicatorError::invalid(
                        descriptor.name,
                        format!(
                            "expects 1 to {} arguments, got {}",
                            descriptor.max_args(),
                            statement.args.len()
                        ),
                    ),
                });
            }
        }

        diagnostics
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
