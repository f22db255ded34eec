//! Property table - the typed map from property names to scalars and group options.

use std::collections::{HashMap, HashSet};
use tracing::trace;

use super::{PropertyError, PropertyGroup, Qualifier, Relation, Value};

/// Where a property name points.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Scalar(Value),
    /// Option of the group at this index.
    Option(usize),
}

/// Result of reading a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyRef<'a> {
    Scalar(&'a Value),
    /// Whether the named option is the active one of its group.
    Option(bool),
}

/// A cascade fired when its trigger option becomes active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implication {
    pub relation: Relation,
    /// Option of another group in the same table.
    pub target: String,
}

/// All properties of one entity.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    slots: HashMap<String, Slot>,
    order: Vec<String>,
    groups: Vec<PropertyGroup>,
    /// Trigger option -> implications, in insertion order.
    implications: HashMap<String, Vec<Implication>>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Property names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Number of declared property names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Declare a scalar property with its default value.
    pub fn declare_scalar(
        &mut self,
        name: impl Into<String>,
        default: Value,
    ) -> Result<(), PropertyError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(PropertyError::AlreadyDeclared(name));
        }
        self.slots.insert(name.clone(), Slot::Scalar(default));
        self.order.push(name);
        Ok(())
    }

    /// Declare a group; every option becomes a property bound to it.
    pub fn declare_group<S: Into<String>>(
        &mut self,
        options: impl IntoIterator<Item = S>,
        qualifier: Option<Qualifier>,
    ) -> Result<(), PropertyError> {
        let group = PropertyGroup::new(options, qualifier)?;

        if let Some(taken) = group.options().iter().find(|o| self.contains(o)) {
            return Err(PropertyError::AlreadyDeclared(taken.clone()));
        }

        let index = self.groups.len();
        for option in group.options() {
            self.slots.insert(option.clone(), Slot::Option(index));
            self.order.push(option.clone());
        }
        self.groups.push(group);
        Ok(())
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Result<PropertyRef<'_>, PropertyError> {
        match self.slot(name)? {
            Slot::Scalar(value) => Ok(PropertyRef::Scalar(value)),
            Slot::Option(index) => Ok(PropertyRef::Option(
                self.groups[*index].is_active(name).unwrap_or(false),
            )),
        }
    }

    /// Read a scalar property.
    pub fn scalar(&self, name: &str) -> Result<&Value, PropertyError> {
        match self.slot(name)? {
            Slot::Scalar(value) => Ok(value),
            Slot::Option(_) => Err(option_is_not_scalar(name)),
        }
    }

    /// Mutable access to a scalar property.
    pub fn scalar_mut(&mut self, name: &str) -> Result<&mut Value, PropertyError> {
        match self.slots.get_mut(name) {
            Some(Slot::Scalar(value)) => Ok(value),
            Some(Slot::Option(_)) => Err(option_is_not_scalar(name)),
            None => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    /// Whether an option is active. Boolean scalars are accepted too.
    pub fn is(&self, name: &str) -> Result<bool, PropertyError> {
        match self.get(name)? {
            PropertyRef::Option(active) => Ok(active),
            PropertyRef::Scalar(Value::Bool(b)) => Ok(*b),
            PropertyRef::Scalar(other) => Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                expected: "an option",
                found: other.type_name(),
            }),
        }
    }

    /// The group an option belongs to.
    pub fn group_of(&self, option: &str) -> Result<&PropertyGroup, PropertyError> {
        let index = self.group_index(option)?;
        Ok(&self.groups[index])
    }

    /// Write a property: options take a truth state, scalars are replaced.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let is_scalar = matches!(self.slot(name)?, Slot::Scalar(_));
        if is_scalar {
            *self.scalar_mut(name)? = value;
            return Ok(());
        }
        match value {
            Value::Bool(on) => self.set_option(name, on),
            other => Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                expected: "a truth state",
                found: other.type_name(),
            }),
        }
    }

    /// Switch an option on or off and fire the implications of whatever
    /// option ends up active.
    pub fn set_option(&mut self, option: &str, on: bool) -> Result<(), PropertyError> {
        let index = self.group_index(option)?;
        let activated = self.groups[index].set(option, on)?;
        self.cascade(&activated)
    }

    pub fn now(&mut self, option: &str) -> Result<(), PropertyError> {
        self.set_option(option, true)
    }

    pub fn now_not(&mut self, option: &str) -> Result<(), PropertyError> {
        self.set_option(option, false)
    }

    pub fn usually(&mut self, option: &str) -> Result<(), PropertyError> {
        self.set_option(option, true)
    }

    pub fn always(&mut self, option: &str) -> Result<(), PropertyError> {
        let index = self.group_index(option)?;
        let activated = self.groups[index].pin_always(option)?;
        self.cascade(&activated)
    }

    pub fn never(&mut self, option: &str) -> Result<(), PropertyError> {
        let index = self.group_index(option)?;
        let activated = self.groups[index].pin_never(option)?;
        self.cascade(&activated)
    }

    /// Attach an implication to `trigger`. If the trigger is already active
    /// the implication fires immediately.
    pub fn add_implication(
        &mut self,
        trigger: &str,
        relation: Relation,
        target: &str,
    ) -> Result<(), PropertyError> {
        let trigger_group = self.group_index(trigger)?;
        self.group_index(target)?;

        self.implications
            .entry(trigger.to_string())
            .or_default()
            .push(Implication {
                relation,
                target: target.to_string(),
            });

        if self.groups[trigger_group].is_active(trigger) == Some(true) {
            self.cascade(trigger)?;
        }
        Ok(())
    }

    /// Implications attached to a trigger option.
    pub fn implications_of(&self, trigger: &str) -> &[Implication] {
        self.implications
            .get(trigger)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn slot(&self, name: &str) -> Result<&Slot, PropertyError> {
        self.slots
            .get(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    fn group_index(&self, option: &str) -> Result<usize, PropertyError> {
        match self.slot(option)? {
            Slot::Option(index) => Ok(*index),
            Slot::Scalar(value) => Err(PropertyError::TypeMismatch {
                property: option.to_string(),
                expected: "an option",
                found: value.type_name(),
            }),
        }
    }

    fn cascade(&mut self, trigger: &str) -> Result<(), PropertyError> {
        let mut fired = HashSet::new();
        self.fire(trigger, &mut fired)
    }

    // Each trigger fires at most once per cascade, so cycles terminate.
    fn fire(&mut self, trigger: &str, fired: &mut HashSet<String>) -> Result<(), PropertyError> {
        if !fired.insert(trigger.to_string()) {
            return Ok(());
        }
        let Some(implications) = self.implications.get(trigger).cloned() else {
            return Ok(());
        };

        for implication in implications {
            let index = self.group_index(&implication.target)?;
            let group = &mut self.groups[index];
            let activated = match implication.relation {
                Relation::Usually => match group.usually(&implication.target) {
                    Ok(activated) => activated,
                    Err(PropertyError::PinConflict { .. }) => {
                        trace!(
                            trigger,
                            target = %implication.target,
                            "usual implication yields to a pin"
                        );
                        continue;
                    }
                    Err(error) => return Err(error),
                },
                Relation::Always => group.pin_always(&implication.target)?,
                Relation::Never => group.pin_never(&implication.target)?,
            };
            self.fire(&activated, fired)?;
        }
        Ok(())
    }
}

fn option_is_not_scalar(name: &str) -> PropertyError {
    PropertyError::TypeMismatch {
        property: name.to_string(),
        expected: "a value",
        found: "an option",
    }
}
