//! Locale Message Table
//!
//! Two tiers of messages: defaults keyed by lower-cased validation kind,
//! and overrides keyed by entity type, then property, then kind.

use crate::{I18nError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use vadacl_config::ConfigLoader;

type PropertyMessages = HashMap<String, String>;
type EntityMessages = HashMap<String, PropertyMessages>;

/// Messages for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTable {
    defaults: HashMap<String, String>,
    entities: HashMap<String, EntityMessages>,
}

impl MessageTable {
    /// An empty table; every lookup resolves to `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English defaults.
    ///
    /// `requiredtrue`, `equalvalues` and `withintruecount` deliberately have
    /// no default: those checks are expected to carry their own message.
    pub fn english() -> Self {
        Self::new()
            .with_default("required", "A value is required")
            .with_default("minlength", "The value is too short.")
            .with_default("maxlength", "The value is too long.")
            .with_default("pattern", "The value does not match the pattern.")
            .with_default("withinlength", "The value does not meet the size requirements")
            .with_default("totals", "The total value does not meet the required total")
    }

    pub fn with_default(mut self, kind: &str, message: impl Into<String>) -> Self {
        self.add_default(kind, message);
        self
    }

    pub fn with_entity_message(
        mut self,
        entity_type: impl Into<String>,
        property: impl Into<String>,
        kind: &str,
        message: impl Into<String>,
    ) -> Self {
        self.add_entity_message(entity_type, property, kind, message);
        self
    }

    pub fn add_default(&mut self, kind: &str, message: impl Into<String>) {
        self.defaults.insert(kind.to_lowercase(), message.into());
    }

    pub fn add_entity_message(
        &mut self,
        entity_type: impl Into<String>,
        property: impl Into<String>,
        kind: &str,
        message: impl Into<String>,
    ) {
        self.entities
            .entry(entity_type.into())
            .or_default()
            .entry(property.into())
            .or_default()
            .insert(kind.to_lowercase(), message.into());
    }

    /// Default message for a kind.
    pub fn default_message(&self, kind: &str) -> Option<&str> {
        self.defaults.get(&kind.to_lowercase()).map(String::as_str)
    }

    /// Entity/property specific message for a kind, without fallback.
    pub fn entity_message(&self, entity_type: &str, property: &str, kind: &str) -> Option<&str> {
        self.entities
            .get(entity_type)?
            .get(property)?
            .get(&kind.to_lowercase())
            .map(String::as_str)
    }

    /// Resolve a message for `kind`.
    ///
    /// The entity/property entry wins when both names are given and the
    /// table has one; otherwise the default for the kind is used. Kind
    /// names match case-insensitively, entity and property names exactly.
    pub fn resolve(&self, kind: &str, entity_type: Option<&str>, property: Option<&str>) -> Option<&str> {
        let specific = match (entity_type, property) {
            (Some(entity_type), Some(property)) => self.entity_message(entity_type, property, kind),
            _ => None,
        };
        specific.or_else(|| self.default_message(kind))
    }

    /// Layer `other` on top of this table. Entries in `other` win.
    pub fn merge(&mut self, other: MessageTable) {
        self.defaults.extend(other.defaults);
        for (entity_type, properties) in other.entities {
            let target = self.entities.entry(entity_type).or_default();
            for (property, kinds) in properties {
                target.entry(property).or_default().extend(kinds);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.entities.is_empty()
    }

    /// Build a table from a parsed document.
    ///
    /// Top-level strings are defaults. Top-level objects are entity
    /// sections whose members are property sections mapping kind names to
    /// messages:
    ///
    /// ```json
    /// {
    ///   "required": "A value is required",
    ///   "Company": { "name": { "required": "Please enter a name." } }
    /// }
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(I18nError::InvalidTable("top level must be an object".to_string()));
        };

        let mut table = Self::new();
        for (key, entry) in root {
            match entry {
                Value::String(message) => table.add_default(&key, message),
                Value::Object(properties) => {
                    for (property, kinds) in properties {
                        let Value::Object(kinds) = kinds else {
                            return Err(I18nError::InvalidTable(format!(
                                "{}.{} must be an object of messages",
                                key, property
                            )));
                        };
                        for (kind, message) in kinds {
                            let Value::String(message) = message else {
                                return Err(I18nError::InvalidTable(format!(
                                    "{}.{}.{} must be a string",
                                    key, property, kind
                                )));
                            };
                            table.add_entity_message(key.clone(), property.clone(), &kind, message);
                        }
                    }
                }
                other => {
                    return Err(I18nError::InvalidTable(format!(
                        "{} must be a string or an object, found {}",
                        key, other
                    )));
                }
            }
        }
        Ok(table)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Load a JSON or TOML table, picking the format from the extension.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = ConfigLoader::auto(path)?.load_file(path)?;
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company_table() -> MessageTable {
        MessageTable::english()
            .with_entity_message("Company", "name", "required", "Please enter a name for the company.")
            .with_entity_message("Company", "city", "minLength", "The city name must be at least 2 characters long.")
    }

    #[test]
    fn test_default_lookup_is_case_insensitive() {
        let table = MessageTable::english();
        assert_eq!(table.resolve("minLength", None, None), Some("The value is too short."));
        assert_eq!(table.resolve("MINLENGTH", None, None), Some("The value is too short."));
    }

    #[test]
    fn test_entity_message_wins() {
        let table = company_table();
        assert_eq!(
            table.resolve("required", Some("Company"), Some("name")),
            Some("Please enter a name for the company.")
        );
        assert_eq!(
            table.resolve("minlength", Some("Company"), Some("city")),
            Some("The city name must be at least 2 characters long.")
        );
    }

    #[test]
    fn test_missing_kind_in_section_falls_back() {
        let table = company_table();
        assert_eq!(
            table.resolve("pattern", Some("Company"), Some("name")),
            Some("The value does not match the pattern.")
        );
    }

    #[test]
    fn test_entity_and_property_are_case_sensitive() {
        let table = company_table();
        assert_eq!(table.resolve("required", Some("company"), Some("name")), Some("A value is required"));
        assert_eq!(table.resolve("required", Some("Company"), Some("Name")), Some("A value is required"));
    }

    #[test]
    fn test_context_needs_both_names() {
        let table = company_table();
        assert_eq!(table.resolve("required", Some("Company"), None), Some("A value is required"));
        assert_eq!(table.resolve("required", None, Some("name")), Some("A value is required"));
    }

    #[test]
    fn test_absent_default() {
        let table = MessageTable::english();
        assert_eq!(table.resolve("equalValues", None, None), None);
        assert_eq!(table.resolve("withinTrueCount", Some("Company"), Some("name")), None);
    }

    #[test]
    fn test_from_json() {
        let table = MessageTable::from_json(
            r#"{
                "required": "Needed",
                "EnterpriseCompany": {
                    "city": { "minlength": "Enterprise city too short" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(table.default_message("required"), Some("Needed"));
        assert_eq!(
            table.entity_message("EnterpriseCompany", "city", "minLength"),
            Some("Enterprise city too short")
        );
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(MessageTable::from_json("[]"), Err(I18nError::InvalidTable(_))));
        assert!(matches!(
            MessageTable::from_json(r#"{"required": 3}"#),
            Err(I18nError::InvalidTable(_))
        ));
        assert!(matches!(
            MessageTable::from_json(r#"{"Company": {"name": "oops"}}"#),
            Err(I18nError::InvalidTable(_))
        ));
        assert!(matches!(MessageTable::from_json("{"), Err(I18nError::Json(_))));
    }

    #[test]
    fn test_merge_overrides() {
        let mut table = MessageTable::english();
        table.merge(
            MessageTable::new()
                .with_default("required", "Required!")
                .with_entity_message("Patient", "agreement", "requiredtrue", "Please agree."),
        );

        assert_eq!(table.default_message("required"), Some("Required!"));
        assert_eq!(table.default_message("pattern"), Some("The value does not match the pattern."));
        assert_eq!(
            table.resolve("requiredTrue", Some("Patient"), Some("agreement")),
            Some("Please agree.")
        );
    }
}
