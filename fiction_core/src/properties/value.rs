//! Scalar property values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entity::EntityId;

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// The absence of a value (an unset location, no opposite, ...).
    #[default]
    Nothing,
    Bool(bool),
    Number(i64),
    Text(String),
    /// Reference to another entity in the world.
    Entity(EntityId),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Create a list of text values.
    pub fn text_list<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Value::List(items.into_iter().map(|s| Value::Text(s.into())).collect())
    }

    /// Create an empty map.
    pub fn empty_map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nothing => "nothing",
            Value::Bool(_) => "a truth state",
            Value::Number(_) => "a number",
            Value::Text(_) => "text",
            Value::Entity(_) => "an entity",
            Value::List(_) => "a list",
            Value::Map(_) => "a map",
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Value::Nothing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityId> {
        match self {
            Value::Entity(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nothing => write!(f, "nothing"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Entity(id) => write!(f, "{}", id),
            Value::List(items) => {
                let parts: Vec<_> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            Value::Map(map) => {
                let parts: Vec<_> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Entity(id)
    }
}

impl From<&EntityId> for Value {
    fn from(id: &EntityId) -> Self {
        Value::Entity(id.clone())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_nothing() {
        assert!(Value::default().is_nothing());
    }

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(Value::from("lamp").as_text(), Some("lamp"));
        assert_eq!(Value::from(100i64).as_number(), Some(100));
        assert_eq!(Value::from(true).as_text(), None);
        assert_eq!(
            Value::from(EntityId::new("north")).as_entity(),
            Some(&EntityId::new("north"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::text_list(["look", "l"]).to_string(), "look, l");
        assert_eq!(Value::Nothing.to_string(), "nothing");
    }

    #[test]
    fn test_serializes_with_variant_tags() {
        let json = serde_json::to_string(&Value::from("Slightly crumpled")).unwrap();
        assert_eq!(json, r#"{"Text":"Slightly crumpled"}"#);
    }
}
