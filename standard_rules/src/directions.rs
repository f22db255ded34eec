//! The twelve standard directions and their opposites.

use fiction_core::{EntityId, IdPolicy, Result, StoryError, Value, World};
use tracing::debug;

use crate::kinds::DIRECTION;

/// Direction names with their short forms.
pub const DIRECTIONS: [(&str, &str); 12] = [
    ("north", "n"),
    ("northeast", "ne"),
    ("northwest", "nw"),
    ("south", "s"),
    ("southeast", "se"),
    ("southwest", "sw"),
    ("east", "e"),
    ("west", "w"),
    ("up", "u"),
    ("down", "d"),
    ("inside", "in"),
    ("outside", "out"),
];

/// Pairs of opposite directions; each is applied both ways.
pub const OPPOSITES: [(&str, &str); 6] = [
    ("north", "south"),
    ("northeast", "southwest"),
    ("northwest", "southeast"),
    ("east", "west"),
    ("up", "down"),
    ("inside", "outside"),
];

/// Create a direction. Directions are singletons, so the name is the id.
pub fn add_direction(world: &mut World, name: &str, short_name: Option<&str>) -> Result<EntityId> {
    let mut direction = world.instantiate(DIRECTION, name, IdPolicy::Literal)?;
    if let Some(short_name) = short_name {
        direction.set("understand as", Value::text_list([name, short_name]))?;
    }
    world.add(direction)
}

/// Make `a` and `b` each other's opposite.
pub fn set_opposites(world: &mut World, a: &EntityId, b: &EntityId) -> Result<()> {
    direction(world, a.as_str())?;
    direction(world, b.as_str())?;
    world.entity_mut(a)?.set("opposite", b)?;
    world.entity_mut(b)?.set("opposite", a)?;
    debug!(direction = %a, opposite = %b, "set opposite directions");
    Ok(())
}

/// Declare the standard directions.
pub fn declare_directions(world: &mut World) -> Result<()> {
    for (name, short_name) in DIRECTIONS {
        add_direction(world, name, Some(short_name))?;
    }
    for (a, b) in OPPOSITES {
        set_opposites(world, &EntityId::new(a), &EntityId::new(b))?;
    }
    Ok(())
}

/// Look up a direction by name.
pub fn direction(world: &World, name: &str) -> Result<EntityId> {
    let id = EntityId::new(name);
    if world.entity(&id)?.kind() != DIRECTION {
        return Err(StoryError::logical(format!("{} is not a direction", name)));
    }
    Ok(id)
}

/// The opposite of a direction, if it has one.
pub fn opposite(world: &World, direction: &EntityId) -> Result<Option<EntityId>> {
    Ok(world.entity(direction)?.entity_ref("opposite")?.cloned())
}
