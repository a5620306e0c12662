// Argument mapping for validator factories
//
// Each kind declares the parameters its factory takes, in call order. A
// rule's settings object supplies those parameters by name; the mapping
// below turns it into the positional list the factory consumes, so the
// compiler can build any kind from its settings alone.

use crate::{RuleError, ValidationKind};
use serde_json::{Map, Value};

/// Parameter names of a validator factory and their zero-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredParameters {
    names: &'static [&'static str],
}

impl DeclaredParameters {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    /// Position of a parameter, if declared.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    /// `(name, position)` pairs in call order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.names.iter().enumerate().map(|(position, name)| (*name, position))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Declared parameters of the factory behind `kind`. The entity type and
/// property used for message lookup are supplied by the compiler, not by
/// settings, so they are not listed.
pub fn declared_parameters(kind: ValidationKind) -> DeclaredParameters {
    match kind {
        ValidationKind::Required | ValidationKind::RequiredTrue | ValidationKind::EqualValues => {
            DeclaredParameters::new(&["message"])
        }
        ValidationKind::MinLength => DeclaredParameters::new(&["minLength", "message"]),
        ValidationKind::MaxLength => DeclaredParameters::new(&["maxLength", "message"]),
        ValidationKind::Pattern => DeclaredParameters::new(&["pattern", "message"]),
        ValidationKind::WithinLength => DeclaredParameters::new(&["minLength", "maxLength", "message"]),
        ValidationKind::Totals => DeclaredParameters::new(&["total", "message"]),
        ValidationKind::WithinTrueCount => DeclaredParameters::new(&["minCount", "maxCount", "message"]),
    }
}

/// Lay named values out in declared order. Parameters without a named
/// value, or with an explicit `null`, are `None`. Names that are not
/// declared are ignored.
pub fn build_argument_list(declared: &DeclaredParameters, named: Option<&Map<String, Value>>) -> Vec<Option<Value>> {
    declared
        .iter()
        .map(|(name, _)| named.and_then(|values| values.get(name)).filter(|v| !v.is_null()).cloned())
        .collect()
}

/// Positional arguments bound to a kind, with typed accessors that report
/// which parameter was missing or malformed.
#[derive(Debug, Clone)]
pub struct Arguments {
    kind: ValidationKind,
    declared: DeclaredParameters,
    values: Vec<Option<Value>>,
}

impl Arguments {
    pub fn new(kind: ValidationKind, values: Vec<Option<Value>>) -> Self {
        Self {
            kind,
            declared: declared_parameters(kind),
            values,
        }
    }

    /// Map a settings object onto `kind`'s parameters.
    pub fn from_settings(kind: ValidationKind, settings: Option<&Map<String, Value>>) -> Self {
        let declared = declared_parameters(kind);
        let values = build_argument_list(&declared, settings);
        Self {
            kind,
            declared,
            values,
        }
    }

    pub fn kind(&self) -> ValidationKind {
        self.kind
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    fn get(&self, name: &'static str) -> Option<&Value> {
        self.declared
            .position(name)
            .and_then(|position| self.values.get(position))
            .and_then(Option::as_ref)
    }

    fn invalid(&self, parameter: &'static str, expected: &'static str) -> RuleError {
        RuleError::InvalidArgument {
            kind: self.kind,
            parameter,
            expected,
        }
    }

    fn missing(&self, parameter: &'static str) -> RuleError {
        RuleError::MissingArgument {
            kind: self.kind,
            parameter,
        }
    }

    pub fn optional_count(&self, name: &'static str) -> Result<Option<u64>, RuleError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => whole_number(value)
                .map(Some)
                .ok_or_else(|| self.invalid(name, "a non-negative whole number")),
        }
    }

    pub fn count(&self, name: &'static str) -> Result<u64, RuleError> {
        self.optional_count(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn length(&self, name: &'static str) -> Result<usize, RuleError> {
        let count = self.count(name)?;
        usize::try_from(count).map_err(|_| self.invalid(name, "a length that fits in memory"))
    }

    pub fn number(&self, name: &'static str) -> Result<f64, RuleError> {
        match self.get(name) {
            None => Err(self.missing(name)),
            Some(value) => value.as_f64().ok_or_else(|| self.invalid(name, "a number")),
        }
    }

    pub fn text(&self, name: &'static str) -> Result<&str, RuleError> {
        self.optional_text(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn optional_text(&self, name: &'static str) -> Result<Option<&str>, RuleError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(_) => Err(self.invalid(name, "a string")),
        }
    }

    /// The optional `message` every kind accepts.
    pub fn message(&self) -> Result<Option<&str>, RuleError> {
        self.optional_text("message")
    }
}

fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let n = value.as_f64()?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}
