//! Map connections between rooms.
//!
//! Every room keeps a `"map connections"` map from direction id to the room
//! that direction leads to.

use fiction_core::{EntityId, Result, StoryError, Value, World};
use tracing::{debug, warn};

use crate::directions::{direction, opposite};
use crate::kinds::ROOM;

/// What to do when a room already has a connection in a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connect {
    /// Replace the existing connection.
    Hard,
    /// Keep the existing connection.
    Soft,
}

/// Connect `from` to `to` going `direction`. Returns whether the connection
/// was made.
pub fn add_map_connection(
    world: &mut World,
    from: &EntityId,
    to: &EntityId,
    direction: &EntityId,
    mode: Connect,
) -> Result<bool> {
    for end in [from, to] {
        if !world.is_a(end, ROOM) {
            let kind = world.entity(end)?.kind();
            return Err(StoryError::logical(format!(
                "can only make connections between rooms, not with {} (a {})",
                end, kind
            )));
        }
    }
    crate::directions::direction(world, direction.as_str())?;

    let from_name = world.entity(from)?.name().to_string();
    if let Some(existing) = connection(world, from, direction)? {
        match mode {
            Connect::Soft => {
                debug!(
                    room = %from_name,
                    direction = %direction,
                    kept = %existing,
                    skipped = %to,
                    "connection already exists, softly leaving it"
                );
                return Ok(false);
            }
            Connect::Hard => {
                warn!(
                    room = %from_name,
                    direction = %direction,
                    replaced = %existing,
                    with = %to,
                    "overwriting map connection"
                );
            }
        }
    }

    world
        .entity_mut(from)?
        .map_mut("map connections")?
        .insert(direction.as_str().to_string(), Value::from(to));
    debug!(room = %from_name, direction = %direction, to = %to, "added map connection");
    Ok(true)
}

/// Where going `direction` from `room` leads.
pub fn connection(world: &World, room: &EntityId, direction: &EntityId) -> Result<Option<EntityId>> {
    let connections = world.entity(room)?.map("map connections")?;
    Ok(connections
        .get(direction.as_str())
        .and_then(|target| target.as_entity())
        .cloned())
}

/// Place `room` relative to other rooms: `("south", awning)` reads "room is
/// south of the Awning".
///
/// The stated side is connected hard; the reverse way back is connected
/// softly, so an explicit connection made earlier wins.
pub fn make_map_connections(
    world: &mut World,
    room: &EntityId,
    bearings: &[(&str, &EntityId)],
) -> Result<()> {
    for (name, other) in bearings {
        let way = direction(world, name)?;
        add_map_connection(world, other, room, &way, Connect::Hard)?;

        match opposite(world, &way)? {
            Some(back) => {
                add_map_connection(world, room, other, &back, Connect::Soft)?;
            }
            None => debug!(direction = %way, "no opposite direction, one-way connection"),
        }
    }
    Ok(())
}
