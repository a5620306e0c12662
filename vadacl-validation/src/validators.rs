// Validator library
//
// Each factory resolves its message once, then returns a validator that
// closes over its parameters. Validators are plain shared closures so the
// same compiled rule can be bound to any number of controls.

use crate::{Arguments, Control, OutcomeDetail, Result, RuleError, ValidationKind, ValidationOutcome};
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use vadacl_i18n::{MessageContext, MessageResolver};

/// A compiled check: `None` when the control passes.
pub type ValidatorFn = Arc<dyn Fn(&dyn Control) -> Option<ValidationOutcome> + Send + Sync>;

/// Factories for every [`ValidationKind`].
#[derive(Debug, Clone, Default)]
pub struct ValidatorLibrary {
    resolver: MessageResolver,
}

impl ValidatorLibrary {
    pub fn new(resolver: MessageResolver) -> Self {
        Self { resolver }
    }

    /// Library over the process-wide message table as installed now.
    pub fn global() -> Self {
        Self::new(MessageResolver::global())
    }

    pub fn resolver(&self) -> &MessageResolver {
        &self.resolver
    }

    fn message(&self, kind: ValidationKind, explicit: Option<&str>, context: &MessageContext) -> Option<String> {
        self.resolver.message_for(explicit, kind.key(), context)
    }

    /// Fails when the value is null or an empty string.
    pub fn required(&self, message: Option<&str>, context: &MessageContext) -> ValidatorFn {
        let message = self.message(ValidationKind::Required, message, context);
        Arc::new(move |control: &dyn Control| {
            is_empty(&control.value())
                .then(|| ValidationOutcome::new(ValidationKind::Required, OutcomeDetail::Required, message.clone()))
        })
    }

    /// Fails unless the value is the boolean `true`.
    pub fn required_true(&self, message: Option<&str>, context: &MessageContext) -> ValidatorFn {
        let message = self.message(ValidationKind::RequiredTrue, message, context);
        Arc::new(move |control: &dyn Control| {
            (*control.value() != Value::Bool(true)).then(|| {
                ValidationOutcome::new(ValidationKind::RequiredTrue, OutcomeDetail::RequiredTrue, message.clone())
            })
        })
    }

    pub fn min_length(&self, min_length: usize, message: Option<&str>, context: &MessageContext) -> ValidatorFn {
        let message = self.message(ValidationKind::MinLength, message, context);
        Arc::new(move |control: &dyn Control| {
            if is_empty_input(control) {
                return None;
            }
            let actual_length = length_of(control)?;
            (actual_length < min_length).then(|| {
                ValidationOutcome::new(
                    ValidationKind::MinLength,
                    OutcomeDetail::MinLength {
                        required_length: min_length,
                        actual_length,
                    },
                    message.clone(),
                )
            })
        })
    }

    pub fn max_length(&self, max_length: usize, message: Option<&str>, context: &MessageContext) -> ValidatorFn {
        let message = self.message(ValidationKind::MaxLength, message, context);
        Arc::new(move |control: &dyn Control| {
            if is_empty_input(control) {
                return None;
            }
            let actual_length = length_of(control)?;
            (actual_length > max_length).then(|| {
                ValidationOutcome::new(
                    ValidationKind::MaxLength,
                    OutcomeDetail::MaxLength {
                        required_length: max_length,
                        actual_length,
                    },
                    message.clone(),
                )
            })
        })
    }

    /// Whole-value match. `^` and `$` are added unless already present.
    pub fn pattern(&self, pattern: &str, message: Option<&str>, context: &MessageContext) -> Result<ValidatorFn> {
        let anchored = anchor(pattern);
        let regex = Regex::new(&anchored).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let message = self.message(ValidationKind::Pattern, message, context);

        Ok(Arc::new(move |control: &dyn Control| {
            if is_empty_input(control) {
                return None;
            }
            let value = control.value();
            let text = match value.as_ref() {
                Value::String(text) => text.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            (!regex.is_match(&text)).then(|| {
                ValidationOutcome::new(
                    ValidationKind::Pattern,
                    OutcomeDetail::Pattern {
                        required_pattern: anchored.clone(),
                        actual_value: value.into_owned(),
                    },
                    message.clone(),
                )
            })
        }))
    }

    /// Fails when the length falls outside `min_length..=max_length`.
    pub fn within_length(
        &self,
        min_length: usize,
        max_length: usize,
        message: Option<&str>,
        context: &MessageContext,
    ) -> ValidatorFn {
        let message = self.message(ValidationKind::WithinLength, message, context);
        Arc::new(move |control: &dyn Control| {
            if is_empty(&control.value()) {
                return None;
            }
            let actual_length = length_of(control)?;
            (actual_length < min_length || actual_length > max_length).then(|| {
                ValidationOutcome::new(
                    ValidationKind::WithinLength,
                    OutcomeDetail::WithinLength {
                        min_length,
                        max_length,
                        actual_length,
                    },
                    message.clone(),
                )
            })
        })
    }

    /// Fails unless the children's numeric values add up to `total`.
    ///
    /// Blank and non-numeric children are skipped. The sum stays unset
    /// until the first number, so an all-blank collection reports no
    /// actual total rather than zero.
    pub fn totals(&self, total: f64, message: Option<&str>, context: &MessageContext) -> ValidatorFn {
        let message = self.message(ValidationKind::Totals, message, context);
        Arc::new(move |control: &dyn Control| {
            let actual_total = control
                .children()
                .iter()
                .filter_map(|child| {
                    let value = child.value();
                    if is_truthy(&value) { to_number(&value) } else { None }
                })
                .fold(None, |sum: Option<f64>, n| Some(sum.unwrap_or(0.0) + n));

            (actual_total != Some(total)).then(|| {
                ValidationOutcome::new(
                    ValidationKind::Totals,
                    OutcomeDetail::Totals {
                        required_total: total,
                        actual_total,
                    },
                    message.clone(),
                )
            })
        })
    }

    /// Fails unless every child strictly equals the first, and the first
    /// is not blank, zero or false.
    pub fn equal_values(&self, message: Option<&str>, context: &MessageContext) -> ValidatorFn {
        let message = self.message(ValidationKind::EqualValues, message, context);
        Arc::new(move |control: &dyn Control| {
            let values: Vec<Value> = control.children().iter().map(|c| c.value().into_owned()).collect();
            let passes = match values.split_first() {
                Some((first, rest)) => is_truthy(first) && rest.iter().all(|v| strict_equals(first, v)),
                None => false,
            };
            (!passes).then(|| {
                ValidationOutcome::new(ValidationKind::EqualValues, OutcomeDetail::EqualValues, message.clone())
            })
        })
    }

    /// Counts children whose value is `true`. A `max_count` of zero or
    /// `None` means no upper bound.
    pub fn within_true_count(
        &self,
        min_count: Option<u64>,
        max_count: Option<u64>,
        message: Option<&str>,
        context: &MessageContext,
    ) -> ValidatorFn {
        let message = self.message(ValidationKind::WithinTrueCount, message, context);
        let min_true = min_count.unwrap_or(0);
        let max_true = max_count.filter(|max| *max > 0);

        Arc::new(move |control: &dyn Control| {
            let true_count = control
                .children()
                .iter()
                .filter(|child| *child.value() == Value::Bool(true))
                .count() as u64;
            let within = true_count >= min_true && max_true.is_none_or(|max| true_count <= max);
            (!within).then(|| {
                ValidationOutcome::new(
                    ValidationKind::WithinTrueCount,
                    OutcomeDetail::WithinTrueCount {
                        min_true,
                        max_true,
                        true_count,
                    },
                    message.clone(),
                )
            })
        })
    }

    /// Build the validator for `arguments.kind()` from its positional
    /// arguments.
    pub fn build(&self, arguments: &Arguments, context: &MessageContext) -> Result<ValidatorFn> {
        let message = arguments.message()?;
        let validator = match arguments.kind() {
            ValidationKind::Required => self.required(message, context),
            ValidationKind::RequiredTrue => self.required_true(message, context),
            ValidationKind::MinLength => self.min_length(arguments.length("minLength")?, message, context),
            ValidationKind::MaxLength => self.max_length(arguments.length("maxLength")?, message, context),
            ValidationKind::Pattern => self.pattern(arguments.text("pattern")?, message, context)?,
            ValidationKind::WithinLength => self.within_length(
                arguments.length("minLength")?,
                arguments.length("maxLength")?,
                message,
                context,
            ),
            ValidationKind::Totals => self.totals(arguments.number("total")?, message, context),
            ValidationKind::EqualValues => self.equal_values(message, context),
            ValidationKind::WithinTrueCount => self.within_true_count(
                arguments.optional_count("minCount")?,
                arguments.optional_count("maxCount")?,
                message,
                context,
            ),
        };
        Ok(validator)
    }
}

fn anchor(pattern: &str) -> String {
    let mut anchored = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !pattern.ends_with('$') {
        anchored.push('$');
    }
    anchored
}

/// Null or the empty string.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

// Length checks also skip empty arrays and collections without children.
fn is_empty_input(control: &dyn Control) -> bool {
    if control.is_collection() {
        return control.children().is_empty();
    }
    match control.value().as_ref() {
        Value::Array(items) => items.is_empty(),
        value => is_empty(value),
    }
}

/// Child count of a collection, characters of a string, elements of an
/// array. Other values have no length.
fn length_of(control: &dyn Control) -> Option<usize> {
    if control.is_collection() {
        return Some(control.children().len());
    }
    match control.value().as_ref() {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

// Same type and same value; `10` and `"10"` differ, `1` and `1.0` do not.
fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}
