// Declarative rule settings and merging

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Validation rules declared for one property: kind name to settings
/// object, in declaration order.
///
/// Settings are the named options of a kind, e.g. `{"minLength": 3,
/// "message": "Too short"}`. Kind names compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValidations {
    entries: Vec<(String, Value)>,
}

/// Rules of an entity, keyed by property name.
pub type EntityValidations = HashMap<String, PropertyValidations>;

impl PropertyValidations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn rule(mut self, kind: impl Into<String>, settings: Value) -> Self {
        self.insert(kind, settings);
        self
    }

    /// Add or replace the settings of a kind. A replaced kind keeps its
    /// position.
    pub fn insert(&mut self, kind: impl Into<String>, settings: Value) {
        let kind = kind.into();
        match self.position(&kind) {
            Some(index) => self.entries[index].1 = settings,
            None => self.entries.push((kind, settings)),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&Value> {
        self.position(kind).map(|index| &self.entries[index].1)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.position(kind).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kind names in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(kind, _)| kind.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(kind, settings)| (kind.as_str(), settings))
    }

    fn position(&self, kind: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(kind))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyValidations {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut validations = Self::new();
        for (kind, settings) in iter {
            validations.insert(kind, settings);
        }
        validations
    }
}

impl Serialize for PropertyValidations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, settings) in &self.entries {
            map.serialize_entry(kind, settings)?;
        }
        map.end()
    }
}

// Hand-written so declaration order survives deserialization.
impl<'de> Deserialize<'de> for PropertyValidations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = PropertyValidations;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of validation kinds to settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut validations = PropertyValidations::new();
                while let Some((kind, settings)) = access.next_entry::<String, Value>()? {
                    validations.insert(kind, settings);
                }
                Ok(validations)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Merge usage-specific overrides into base rules.
///
/// With no overrides the base is returned as is. Otherwise each
/// overridden kind has its settings merged field by field into the base
/// settings of the same kind, keeping that kind's position; kinds only
/// present in the overrides are appended in override order.
pub fn merge_validations<'a>(
    base: &'a PropertyValidations,
    overrides: Option<&PropertyValidations>,
) -> Cow<'a, PropertyValidations> {
    let Some(overrides) = overrides else {
        return Cow::Borrowed(base);
    };

    let mut merged = base.clone();
    for (kind, settings) in overrides.iter() {
        match merged.position(kind) {
            Some(index) => merge_settings(&mut merged.entries[index].1, settings),
            None => merged.entries.push((kind.to_string(), settings.clone())),
        }
    }
    Cow::Owned(merged)
}

fn merge_settings(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (field, value) in overrides {
                base.insert(field.clone(), value.clone());
            }
        }
        // Null overrides leave the base alone; anything else replaces it.
        (_, Value::Null) => {}
        (base, overrides) => *base = overrides.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_overrides_returns_base() {
        let base = PropertyValidations::new().rule("required", json!({ "message": "Base message" }));
        let merged = merge_validations(&base, None);
        assert!(matches!(merged, Cow::Borrowed(_)));
        assert_eq!(*merged, base);
    }

    #[test]
    fn test_new_kinds_are_appended() {
        let base = PropertyValidations::new().rule("required", json!({ "message": "Base message" }));
        let overrides = PropertyValidations::new()
            .rule("minLength", json!({ "minLength": 2, "message": "minLength message" }));

        let merged = merge_validations(&base, Some(&overrides));
        assert_eq!(merged.kinds().collect::<Vec<_>>(), vec!["required", "minLength"]);
        assert_eq!(merged.get("minLength").unwrap()["minLength"], 2);
    }

    #[test]
    fn test_matching_kinds_merge_field_by_field() {
        let base = PropertyValidations::new()
            .rule("maxLength", json!({ "maxLength": 8, "message": "maxLength base message" }))
            .rule("minLength", json!({ "minLength": 2 }));
        let overrides = PropertyValidations::new()
            .rule("maxLength", json!({ "message": "Override message" }))
            .rule("minLength", json!({ "minLength": 4 }));

        let merged = merge_validations(&base, Some(&overrides));
        assert_eq!(merged.get("maxLength").unwrap()["maxLength"], 8);
        assert_eq!(merged.get("maxLength").unwrap()["message"], "Override message");
        assert_eq!(merged.get("minLength").unwrap()["minLength"], 4);
        assert_eq!(merged.kinds().collect::<Vec<_>>(), vec!["maxLength", "minLength"]);
    }

    #[test]
    fn test_merge_does_not_touch_base() {
        let base = PropertyValidations::new().rule("minLength", json!({ "minLength": 2 }));
        let overrides = PropertyValidations::new().rule("minLength", json!({ "minLength": 4 }));

        let _ = merge_validations(&base, Some(&overrides));
        assert_eq!(base.get("minLength").unwrap()["minLength"], 2);
    }

    #[test]
    fn test_kind_names_match_case_insensitively() {
        let base = PropertyValidations::new().rule("minLength", json!({ "minLength": 2 }));
        let overrides = PropertyValidations::new().rule("minlength", json!({ "message": "short" }));

        let merged = merge_validations(&base, Some(&overrides));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("MINLENGTH").unwrap(), &json!({ "minLength": 2, "message": "short" }));
    }

    #[test]
    fn test_deserialize_keeps_declaration_order() {
        let validations: PropertyValidations = serde_json::from_str(
            r#"{ "required": {}, "pattern": { "pattern": "[a-z]+" }, "maxLength": { "maxLength": 5 } }"#,
        )
        .unwrap();
        assert_eq!(
            validations.kinds().collect::<Vec<_>>(),
            vec!["required", "pattern", "maxLength"]
        );

        let round = serde_json::to_string(&validations).unwrap();
        assert!(round.find("required").unwrap() < round.find("maxLength").unwrap());
    }
}
