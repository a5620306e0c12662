// Validation kinds

use crate::RuleError;
use std::fmt;
use std::str::FromStr;

/// The fixed catalog of validation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    Required,
    RequiredTrue,
    MinLength,
    MaxLength,
    Pattern,
    WithinLength,
    Totals,
    EqualValues,
    WithinTrueCount,
}

impl ValidationKind {
    pub const ALL: [ValidationKind; 9] = [
        ValidationKind::Required,
        ValidationKind::RequiredTrue,
        ValidationKind::MinLength,
        ValidationKind::MaxLength,
        ValidationKind::Pattern,
        ValidationKind::WithinLength,
        ValidationKind::Totals,
        ValidationKind::EqualValues,
        ValidationKind::WithinTrueCount,
    ];

    /// Name used in rule declarations, e.g. `minLength`.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationKind::Required => "required",
            ValidationKind::RequiredTrue => "requiredTrue",
            ValidationKind::MinLength => "minLength",
            ValidationKind::MaxLength => "maxLength",
            ValidationKind::Pattern => "pattern",
            ValidationKind::WithinLength => "withinLength",
            ValidationKind::Totals => "totals",
            ValidationKind::EqualValues => "equalValues",
            ValidationKind::WithinTrueCount => "withinTrueCount",
        }
    }

    /// Lower-cased name: the outcome key and the message table key.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationKind::Required => "required",
            ValidationKind::RequiredTrue => "requiredtrue",
            ValidationKind::MinLength => "minlength",
            ValidationKind::MaxLength => "maxlength",
            ValidationKind::Pattern => "pattern",
            ValidationKind::WithinLength => "withinlength",
            ValidationKind::Totals => "totals",
            ValidationKind::EqualValues => "equalvalues",
            ValidationKind::WithinTrueCount => "withintruecount",
        }
    }

    /// Kinds that evaluate the children of a group or array control.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ValidationKind::Totals | ValidationKind::EqualValues | ValidationKind::WithinTrueCount
        )
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.key() == lowered)
    }
}

impl FromStr for ValidationKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RuleError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
