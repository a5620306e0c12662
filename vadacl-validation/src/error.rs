// Rule configuration errors

use crate::ValidationKind;
use thiserror::Error;

/// A rule declaration that cannot be turned into a validator.
///
/// Missing entities, properties or overrides are not errors; they simply
/// yield no validators. These variants cover declarations that would
/// otherwise be dropped or misapplied silently.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Unknown validation kind: {0}")]
    UnknownKind(String),

    #[error("Settings for {kind} must be an object")]
    InvalidSettings { kind: ValidationKind },

    #[error("{kind} requires the {parameter} setting")]
    MissingArgument {
        kind: ValidationKind,
        parameter: &'static str,
    },

    #[error("{kind} setting {parameter} must be {expected}")]
    InvalidArgument {
        kind: ValidationKind,
        parameter: &'static str,
        expected: &'static str,
    },

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Entity type {entity_type} extends unknown type {parent}")]
    UnknownParent { entity_type: String, parent: String },

    #[error("Entity type {0} is part of an inheritance cycle")]
    InheritanceCycle(String),

    #[error("Failed to load rules: {0}")]
    Config(#[from] vadacl_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, RuleError>;
