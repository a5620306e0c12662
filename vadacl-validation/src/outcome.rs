// Validation outcomes

use crate::ValidationKind;
use serde_json::{Map, Value, json};
use std::fmt;

/// Kind-specific diagnostic fields of an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeDetail {
    Required,
    RequiredTrue,
    MinLength {
        required_length: usize,
        actual_length: usize,
    },
    MaxLength {
        required_length: usize,
        actual_length: usize,
    },
    Pattern {
        required_pattern: String,
        actual_value: Value,
    },
    WithinLength {
        min_length: usize,
        max_length: usize,
        actual_length: usize,
    },
    Totals {
        required_total: f64,
        /// `None` until at least one child carried a number.
        actual_total: Option<f64>,
    },
    EqualValues,
    WithinTrueCount {
        min_true: u64,
        max_true: Option<u64>,
        true_count: u64,
    },
    /// Fields of an outcome recorded by the form layer rather than by a
    /// catalog validator.
    Custom(Map<String, Value>),
}

/// A failed check: the non-null result of a validator.
///
/// Serializes as a single-key object, `{ "<kind>": { ..fields, "message" } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    key: String,
    message: Option<String>,
    detail: OutcomeDetail,
}

impl ValidationOutcome {
    pub fn new(kind: ValidationKind, detail: OutcomeDetail, message: Option<String>) -> Self {
        Self {
            key: kind.key().to_string(),
            message,
            detail,
        }
    }

    /// An outcome with an arbitrary key and payload. A string `message`
    /// member of the payload becomes the outcome message.
    pub fn custom(key: impl Into<String>, payload: Value) -> Self {
        let mut fields = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let message = match fields.remove("message") {
            Some(Value::String(message)) => Some(message),
            _ => None,
        };
        Self {
            key: key.into().to_lowercase(),
            message,
            detail: OutcomeDetail::Custom(fields),
        }
    }

    /// Lower-cased kind name this outcome is keyed under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Option<ValidationKind> {
        ValidationKind::parse(&self.key)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn detail(&self) -> &OutcomeDetail {
        &self.detail
    }

    /// The payload object: diagnostic fields plus `message` when present.
    pub fn payload(&self) -> Value {
        let mut payload = match &self.detail {
            OutcomeDetail::Required => json!({ "isEmpty": true }),
            OutcomeDetail::RequiredTrue => json!({ "isNotTrue": true }),
            OutcomeDetail::MinLength {
                required_length,
                actual_length,
            }
            | OutcomeDetail::MaxLength {
                required_length,
                actual_length,
            } => json!({ "requiredLength": required_length, "actualLength": actual_length }),
            OutcomeDetail::Pattern {
                required_pattern,
                actual_value,
            } => json!({ "requiredPattern": required_pattern, "actualValue": actual_value }),
            OutcomeDetail::WithinLength {
                min_length,
                max_length,
                actual_length,
            } => json!({
                "minLength": min_length,
                "maxLength": max_length,
                "actualLength": actual_length,
            }),
            OutcomeDetail::Totals {
                required_total,
                actual_total,
            } => json!({
                "requiredTotal": number(*required_total),
                "actualTotal": actual_total.map(number),
            }),
            OutcomeDetail::EqualValues => json!({}),
            OutcomeDetail::WithinTrueCount {
                min_true,
                max_true,
                true_count,
            } => json!({ "minTrue": min_true, "maxTrue": max_true, "trueCount": true_count }),
            OutcomeDetail::Custom(fields) => Value::Object(fields.clone()),
        };

        if let (Some(message), Value::Object(map)) = (&self.message, &mut payload) {
            map.insert("message".to_string(), Value::String(message.clone()));
        }
        payload
    }

    pub fn to_json(&self) -> Value {
        let mut outer = Map::new();
        outer.insert(self.key.clone(), self.payload());
        Value::Object(outer)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.key, message),
            None => f.write_str(&self.key),
        }
    }
}

// Whole numbers serialize as integers so totals read naturally.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

/// Current errors of a control, in the order they were recorded.
///
/// Keys are unique: recording a second outcome under an existing key
/// replaces the first in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    outcomes: Vec<ValidationOutcome>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn add(&mut self, outcome: ValidationOutcome) {
        match self.outcomes.iter_mut().find(|o| o.key == outcome.key) {
            Some(existing) => *existing = outcome,
            None => self.outcomes.push(outcome),
        }
    }

    /// Look up an outcome by kind name, case-insensitively.
    pub fn get(&self, kind: &str) -> Option<&ValidationOutcome> {
        let key = kind.to_lowercase();
        self.outcomes.iter().find(|o| o.key == key)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationOutcome> {
        self.outcomes.iter()
    }

    /// Messages of outcomes that carry one, in recorded order.
    pub fn messages(&self) -> Vec<&str> {
        self.outcomes.iter().filter_map(|o| o.message()).collect()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .outcomes
            .iter()
            .map(|o| (o.key.clone(), o.payload()))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<ValidationOutcome> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationOutcome>>(iter: I) -> Self {
        let mut errors = Self::new();
        for outcome in iter {
            errors.add(outcome);
        }
        errors
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationOutcome;
    type IntoIter = std::slice::Iter<'a, ValidationOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        Ok(())
    }
}
