// Validatable entities and the rule catalog

use crate::{EntityValidations, PropertyValidations, Result, RuleError, merge_validations};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A record that may declare validation rules for its properties.
///
/// `entity_type` is the tag used for entity-specific locale messages, so
/// two types sharing the same rules can still carry different messages.
pub trait Validatable {
    fn entity_type(&self) -> &str;

    /// Rules keyed by property name, if the entity declares any.
    fn validations(&self) -> Option<&EntityValidations> {
        None
    }

    /// Whether the entity has a property of this name.
    fn has_property(&self, _property: &str) -> bool {
        true
    }

    /// Declared rules for one property.
    fn property_validations(&self, property: &str) -> Option<&PropertyValidations> {
        self.validations()?.get(property)
    }
}

/// Data-driven entity description.
///
/// ```json
/// {
///   "type": "Company",
///   "properties": ["name", "state"],
///   "validations": {
///     "state": { "required": {}, "pattern": { "pattern": "[A-Z]{2}" } }
///   }
/// }
/// ```
///
/// With an empty `properties` list, any property with rules exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    #[serde(default)]
    pub validations: EntityValidations,
    /// Type whose properties and rules this one inherits.
    ///
    /// Inheritance is applied when the schema goes through
    /// [`EntityCatalog`]; a schema used on its own only has its own rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl EntitySchema {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            ..Self::default()
        }
    }

    pub fn property(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.properties.contains(&name) {
            self.properties.push(name);
        }
        self
    }

    /// Declare rules for a property, adding the property if needed.
    pub fn validate(mut self, property: impl Into<String>, validations: PropertyValidations) -> Self {
        let property = property.into();
        self = self.property(property.clone());
        self.validations.insert(property, validations);
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    // Parent properties first, then our own; our rules merge over the
    // parent's rules for the same property.
    fn inherit(&self, parent: &EntitySchema) -> EntitySchema {
        let mut properties = parent.properties.clone();
        for property in &self.properties {
            if !properties.contains(property) {
                properties.push(property.clone());
            }
        }

        let mut validations = parent.validations.clone();
        for (property, own) in &self.validations {
            let merged = match parent.validations.get(property) {
                Some(inherited) => merge_validations(inherited, Some(own)).into_owned(),
                None => own.clone(),
            };
            validations.insert(property.clone(), merged);
        }

        // An explicit list must still cover every property with rules.
        if !properties.is_empty() {
            let mut ruled: Vec<&String> = validations.keys().filter(|p| !properties.contains(p)).collect();
            ruled.sort();
            properties.extend(ruled.into_iter().cloned());
        }

        EntitySchema {
            entity_type: self.entity_type.clone(),
            properties,
            validations,
            extends: None,
        }
    }
}

impl Validatable for EntitySchema {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn validations(&self) -> Option<&EntityValidations> {
        Some(&self.validations)
    }

    fn has_property(&self, property: &str) -> bool {
        if self.properties.is_empty() {
            self.validations.contains_key(property)
        } else {
            self.properties.iter().any(|p| p == property)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entities: Vec<EntitySchema>,
}

/// Entity schemas by type name, with inheritance already applied.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    schemas: HashMap<String, EntitySchema>,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, resolving every `extends` chain.
    pub fn from_schemas(schemas: impl IntoIterator<Item = EntitySchema>) -> Result<Self> {
        let declared: HashMap<String, EntitySchema> = schemas
            .into_iter()
            .map(|schema| (schema.entity_type.clone(), schema))
            .collect();

        let mut schemas = HashMap::with_capacity(declared.len());
        for (name, schema) in &declared {
            let resolved = resolve(schema, &declared, &mut HashSet::new())?;
            schemas.insert(name.clone(), resolved);
        }

        vadacl_log::debug!(target: "vadacl::rules", "Loaded {} entity schemas", schemas.len());
        Ok(Self { schemas })
    }

    /// Load a catalog from a JSON or TOML file with an `entities` list.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let file: CatalogFile = vadacl_config::load_typed(path)?;
        Self::from_schemas(file.entities)
    }

    pub fn get(&self, entity_type: &str) -> Option<&EntitySchema> {
        self.schemas.get(entity_type)
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.schemas.contains_key(entity_type)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

fn resolve(
    schema: &EntitySchema,
    declared: &HashMap<String, EntitySchema>,
    visiting: &mut HashSet<String>,
) -> Result<EntitySchema> {
    if !visiting.insert(schema.entity_type.clone()) {
        return Err(RuleError::InheritanceCycle(schema.entity_type.clone()));
    }

    let Some(parent) = &schema.extends else {
        return Ok(schema.clone());
    };
    let parent = declared.get(parent).ok_or_else(|| RuleError::UnknownParent {
        entity_type: schema.entity_type.clone(),
        parent: parent.clone(),
    })?;
    let parent = resolve(parent, declared, visiting)?;
    Ok(schema.inherit(&parent))
}
