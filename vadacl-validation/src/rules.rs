// Rule compilation
//
// Turns declared rules into validator functions. The rules of a property
// come from its entity, merged with any usage-specific overrides, and are
// compiled in merged declaration order.

use crate::{
    Arguments, PropertyValidations, Result, RuleError, Validatable, ValidationKind, ValidatorFn, ValidatorLibrary,
    merge_validations,
};
use serde_json::Value;
use vadacl_i18n::{MessageContext, MessageResolver};

/// Compiles declared rules with one validator library.
#[derive(Debug, Clone, Default)]
pub struct RuleCompiler {
    library: ValidatorLibrary,
}

impl RuleCompiler {
    pub fn new(resolver: MessageResolver) -> Self {
        Self::with_library(ValidatorLibrary::new(resolver))
    }

    pub fn with_library(library: ValidatorLibrary) -> Self {
        Self { library }
    }

    /// Compiler over the process-wide message table as installed now.
    pub fn global() -> Self {
        Self::with_library(ValidatorLibrary::global())
    }

    pub fn library(&self) -> &ValidatorLibrary {
        &self.library
    }

    /// Validators for `property` of `entity`.
    ///
    /// An absent entity or property, a property the entity does not have,
    /// or no rules after merging all yield an empty list. Entity-specific
    /// messages are looked up under the entity's type tag.
    pub fn apply_rules(
        &self,
        entity: Option<&dyn Validatable>,
        property: Option<&str>,
        overrides: Option<&PropertyValidations>,
    ) -> Result<Vec<ValidatorFn>> {
        let (Some(entity), Some(property)) = (entity, property) else {
            vadacl_log::debug!(target: "vadacl::rules", "No entity or property given, no rules apply");
            return Ok(Vec::new());
        };
        if !entity.has_property(property) {
            vadacl_log::debug!(
                target: "vadacl::rules",
                "{} has no property {}, no rules apply",
                entity.entity_type(),
                property
            );
            return Ok(Vec::new());
        }

        let empty = PropertyValidations::new();
        let base = entity.property_validations(property).unwrap_or(&empty);
        let merged = merge_validations(base, overrides);
        let context = MessageContext::new(Some(entity.entity_type()), Some(property));
        self.compile(&merged, &context)
    }

    /// Validators for a group or array control.
    ///
    /// Works like [`apply_rules`](Self::apply_rules) but needs no entity:
    /// without one, the overrides alone are compiled and only default or
    /// explicit messages apply.
    pub fn apply_collection_rule(
        &self,
        entity: Option<&dyn Validatable>,
        property: Option<&str>,
        overrides: Option<&PropertyValidations>,
    ) -> Result<Vec<ValidatorFn>> {
        let empty = PropertyValidations::new();
        let base = match (entity, property) {
            (Some(entity), Some(property)) => entity.property_validations(property).unwrap_or(&empty),
            _ => &empty,
        };
        let merged = merge_validations(base, overrides);

        for kind in merged.kinds().filter_map(ValidationKind::parse) {
            if !kind.is_collection() {
                vadacl_log::warn!(
                    target: "vadacl::rules",
                    "{} checks a single value but is applied to a collection",
                    kind
                );
            }
        }

        let context = MessageContext::new(entity.map(|e| e.entity_type()), property);
        self.compile(&merged, &context)
    }

    /// Compile rules in declaration order.
    ///
    /// A kind outside the catalog fails the whole compilation rather than
    /// being skipped.
    pub fn compile(&self, validations: &PropertyValidations, context: &MessageContext) -> Result<Vec<ValidatorFn>> {
        let mut validators = Vec::with_capacity(validations.len());

        for (name, settings) in validations.iter() {
            let kind = ValidationKind::parse(name).ok_or_else(|| {
                vadacl_log::error!(target: "vadacl::rules", "Unknown validation kind: {}", name);
                RuleError::UnknownKind(name.to_string())
            })?;

            let settings = match settings {
                Value::Object(map) => Some(map),
                Value::Null => None,
                _ => return Err(RuleError::InvalidSettings { kind }),
            };
            let arguments = Arguments::from_settings(kind, settings);
            validators.push(self.library.build(&arguments, context)?);

            vadacl_log::debug!(
                target: "vadacl::rules",
                "Compiled {} for {}.{}",
                kind,
                context.entity_type.as_deref().unwrap_or("-"),
                context.property.as_deref().unwrap_or("-")
            );
        }

        Ok(validators)
    }
}

/// [`RuleCompiler::apply_rules`] with the process-wide message table.
pub fn apply_rules(
    entity: Option<&dyn Validatable>,
    property: Option<&str>,
    overrides: Option<&PropertyValidations>,
) -> Result<Vec<ValidatorFn>> {
    RuleCompiler::global().apply_rules(entity, property, overrides)
}

/// [`RuleCompiler::apply_collection_rule`] with the process-wide message
/// table.
pub fn apply_collection_rule(
    entity: Option<&dyn Validatable>,
    property: Option<&str>,
    overrides: Option<&PropertyValidations>,
) -> Result<Vec<ValidatorFn>> {
    RuleCompiler::global().apply_collection_rule(entity, property, overrides)
}
