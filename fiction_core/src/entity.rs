//! Entity definitions for the story world.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{Result, StoryError};
use crate::properties::{PropertyError, PropertyRef, PropertyTable, Qualifier, Relation, Value};

/// Unique identifier for all entities in the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Use `id` verbatim.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate an id from a display name: the lowercased name cut to eight
    /// characters with spaces removed, followed by eight random hex digits.
    pub fn generate(name: &str) -> Self {
        let stem: String = name
            .to_lowercase()
            .chars()
            .take(8)
            .filter(|c| *c != ' ')
            .collect();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", stem, &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How an entity's id is derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Name stem plus a random suffix.
    #[default]
    Generated,
    /// The name itself. Used for singletons such as directions and actions.
    Literal,
}

/// A concrete object in the world, instantiated from a kind.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    kind: String,
    properties: PropertyTable,
}

impl Entity {
    /// Create an entity carrying only the base properties every kind shares.
    pub fn new(name: impl Into<String>, kind: impl Into<String>, policy: IdPolicy) -> Result<Self> {
        let name = name.into();
        let id = match policy {
            IdPolicy::Generated => EntityId::generate(&name),
            IdPolicy::Literal => EntityId::new(name.clone()),
        };

        let mut entity = Self {
            id,
            kind: kind.into(),
            properties: PropertyTable::new(),
            name,
        };
        entity.has("indefinite article", Value::text(""))?;
        entity.has("understand as", Value::text_list([entity.name.clone()]))?;
        entity.can_be_one_of(
            &["singular-named", "plural-named"],
            Some(Qualifier::usually("singular-named")),
        )?;
        entity.can_be_one_of(
            &["proper-named", "improper-named"],
            Some(Qualifier::usually("improper-named")),
        )?;
        Ok(entity)
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the kind this entity was instantiated from.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Whether a property with this name was declared.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    // Declarations

    /// Declare a scalar property.
    pub fn has(&mut self, property: &str, default: impl Into<Value>) -> Result<()> {
        let result = self.properties.declare_scalar(property, default.into());
        self.wrap(result)
    }

    /// Declare a boolean flag; its negation is added automatically.
    pub fn can_be(&mut self, option: &str, qualifier: Option<Qualifier>) -> Result<()> {
        let result = self.properties.declare_group([option], qualifier);
        self.wrap(result)
    }

    /// Declare a mutually exclusive group of options.
    pub fn can_be_one_of(&mut self, options: &[&str], qualifier: Option<Qualifier>) -> Result<()> {
        let result = self
            .properties
            .declare_group(options.iter().copied(), qualifier);
        self.wrap(result)
    }

    /// Make `target` follow whenever `trigger` becomes active.
    pub fn imply(&mut self, trigger: &str, relation: Relation, target: &str) -> Result<()> {
        let result = self.properties.add_implication(trigger, relation, target);
        self.wrap(result)
    }

    pub fn now(&mut self, option: &str) -> Result<()> {
        let result = self.properties.now(option);
        self.wrap(result)
    }

    pub fn now_not(&mut self, option: &str) -> Result<()> {
        let result = self.properties.now_not(option);
        self.wrap(result)
    }

    pub fn usually(&mut self, option: &str) -> Result<()> {
        let result = self.properties.usually(option);
        self.wrap(result)
    }

    pub fn always(&mut self, option: &str) -> Result<()> {
        let result = self.properties.always(option);
        self.wrap(result)
    }

    pub fn never(&mut self, option: &str) -> Result<()> {
        let result = self.properties.never(option);
        self.wrap(result)
    }

    // Reads and writes

    pub fn get(&self, property: &str) -> Result<PropertyRef<'_>> {
        let result = self.properties.get(property);
        self.wrap(result)
    }

    /// Whether an option (or boolean scalar) holds.
    pub fn is(&self, option: &str) -> Result<bool> {
        let result = self.properties.is(option);
        self.wrap(result)
    }

    pub fn scalar(&self, property: &str) -> Result<&Value> {
        let result = self.properties.scalar(property);
        self.wrap(result)
    }

    pub fn text(&self, property: &str) -> Result<&str> {
        let value = self.scalar(property)?;
        value
            .as_text()
            .ok_or_else(|| self.mismatch(property, "text", value))
    }

    pub fn number(&self, property: &str) -> Result<i64> {
        let value = self.scalar(property)?;
        value
            .as_number()
            .ok_or_else(|| self.mismatch(property, "a number", value))
    }

    /// Entity referenced by a property, `None` when it holds nothing.
    pub fn entity_ref(&self, property: &str) -> Result<Option<&EntityId>> {
        match self.scalar(property)? {
            Value::Nothing => Ok(None),
            Value::Entity(id) => Ok(Some(id)),
            other => Err(self.mismatch(property, "an entity", other)),
        }
    }

    pub fn list(&self, property: &str) -> Result<&[Value]> {
        let value = self.scalar(property)?;
        value
            .as_list()
            .ok_or_else(|| self.mismatch(property, "a list", value))
    }

    pub fn map(&self, property: &str) -> Result<&BTreeMap<String, Value>> {
        let value = self.scalar(property)?;
        value
            .as_map()
            .ok_or_else(|| self.mismatch(property, "a map", value))
    }

    pub fn map_mut(&mut self, property: &str) -> Result<&mut BTreeMap<String, Value>> {
        let (entity, kind) = (self.name.clone(), self.kind.clone());
        let value = self
            .properties
            .scalar_mut(property)
            .map_err(|source| StoryError::Property {
                entity: entity.clone(),
                kind: kind.clone(),
                source,
            })?;
        let found = value.type_name();
        value.as_map_mut().ok_or_else(|| StoryError::Property {
            entity,
            kind,
            source: PropertyError::TypeMismatch {
                property: property.to_string(),
                expected: "a map",
                found,
            },
        })
    }

    /// Write a property: options take a truth state, scalars are replaced.
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> Result<()> {
        let result = self.properties.write(property, value.into());
        self.wrap(result)
    }

    fn wrap<T>(&self, result: std::result::Result<T, PropertyError>) -> Result<T> {
        result.map_err(|source| StoryError::Property {
            entity: self.name.clone(),
            kind: self.kind.clone(),
            source,
        })
    }

    fn mismatch(&self, property: &str, expected: &'static str, found: &Value) -> StoryError {
        StoryError::Property {
            entity: self.name.clone(),
            kind: self.kind.clone(),
            source: PropertyError::TypeMismatch {
                property: property.to_string(),
                expected,
                found: found.type_name(),
            },
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
