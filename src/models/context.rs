//! Evaluation-time variable environment

use crate::models::candle::Candle;
use crate::models::value::{Value, ValueKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Attempt to rebind a name with a value of a different kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("'{name}' is bound as {existing}, cannot rebind it as {attempted}")]
pub struct KindConflict {
    pub name: String,
    pub existing: ValueKind,
    pub attempted: ValueKind,
}

/// Maps variable names to series or scalars for one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MarketContext {
    values: BTreeMap<String, Value>,
}

impl MarketContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from raw named series (e.g. `{"close": [...]}`).
    pub fn from_series(data: HashMap<String, Vec<f64>>) -> Self {
        Self {
            values: data
                .into_iter()
                .map(|(name, series)| (name, Value::Series(series)))
                .collect(),
        }
    }

    /// Bind `open`, `high`, `low`, `close` and `volume` series from candles.
    pub fn from_candles<'a>(candles: impl IntoIterator<Item = &'a Candle>) -> Self {
        let mut open = Vec::new();
        let mut high = Vec::new();
        let mut low = Vec::new();
        let mut close = Vec::new();
        let mut volume = Vec::new();

        for candle in candles {
            open.push(candle.open);
            high.push(candle.high);
            low.push(candle.low);
            close.push(candle.close);
            volume.push(candle.volume);
        }

        let mut values = BTreeMap::new();
        values.insert("open".to_string(), Value::Series(open));
        values.insert("high".to_string(), Value::Series(high));
        values.insert("low".to_string(), Value::Series(low));
        values.insert("close".to_string(), Value::Series(close));
        values.insert("volume".to_string(), Value::Series(volume));
        Self { values }
    }

    pub fn with_series(mut self, name: &str, series: Vec<f64>) -> Self {
        self.values.insert(name.to_string(), Value::Series(series));
        self
    }

    pub fn with_scalar(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), Value::Scalar(value));
        self
    }

    /// Bind a value. A name keeps its kind once bound; rebinding with the
    /// same kind replaces the value.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<(), KindConflict> {
        if let Some(existing) = self.values.get(name) {
            if existing.kind() != value.kind() {
                return Err(KindConflict {
                    name: name.to_string(),
                    existing: existing.kind(),
                    attempted: value.kind(),
                });
            }
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Latest comparable sample bound to `name`
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::latest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
