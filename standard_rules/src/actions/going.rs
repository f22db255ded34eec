//! Going - moving through a map connection.

use fiction_core::{
    EntityId, Outcome, Placement, Result, Rule, RuleContext, StoryError, Value, World,
};

use super::looking::{enclosing_room, LOOKING};
use crate::kinds::{DIRECTION, ROOM, VEHICLE};
use crate::map::connection;

pub const GOING: &str = "going";

/// Per-attempt variables kept on the going action.
const GOING_VARIABLES: [&str; 5] = [
    "room gone from",
    "room gone to",
    "door gone through",
    "vehicle gone by",
    "thing gone with",
];

pub fn declare_going(world: &mut World) -> Result<()> {
    let id = world.declare_action(GOING, &["go", "walk"], 1)?;
    let going = world.entity_mut(&id)?;
    for variable in GOING_VARIABLES {
        going.has(variable, Value::Nothing)?;
    }

    let books = world.action(GOING)?.rulebooks().clone();
    world.add_rule(
        &books.set_variables,
        Rule::new("standard set going variables rule", set_going_variables),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.check,
        Rule::new("determine map connection rule", determine_map_connection),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.carry_out,
        Rule::new("move player and vehicle rule", move_player_and_vehicle),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.report,
        Rule::new("describe room gone into rule", describe_room_gone_into),
        Placement::Tail,
    )
}

fn set_going_variables(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let actor = context.actor()?;
    let (from, vehicle) = if world.location_of(actor)?.is_some() {
        let (room, holders) = enclosing_room(world, actor)?;
        let vehicle = holders.into_iter().find(|holder| world.is_a(holder, VEHICLE));
        (Some(room), vehicle)
    } else {
        (None, None)
    };

    let going = world.entity_mut(context.action()?)?;
    for variable in GOING_VARIABLES {
        going.set(variable, Value::Nothing)?;
    }
    if let Some(from) = from {
        going.set("room gone from", from)?;
    }
    if let Some(vehicle) = vehicle {
        going.set("vehicle gone by", vehicle)?;
    }
    Ok(None)
}

fn determine_map_connection(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let way = context.noun(0)?;
    let from = world
        .entity(context.action()?)?
        .entity_ref("room gone from")?
        .cloned();

    let is_direction = world.entity(way)?.kind() == DIRECTION;
    let target = match from {
        Some(room) if is_direction && world.is_a(&room, ROOM) => connection(world, &room, way)?,
        _ => None,
    };

    match target {
        Some(to) => {
            world.entity_mut(context.action()?)?.set("room gone to", to)?;
            Ok(None)
        }
        None => {
            world.say("You can't go that way.");
            Ok(Some(Outcome::Failed))
        }
    }
}

fn move_player_and_vehicle(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let way = world.entity(context.noun(0)?)?.name().to_string();
    let going = world.entity(context.action()?)?;
    let to = going
        .entity_ref("room gone to")?
        .cloned()
        .ok_or_else(|| StoryError::logical("going was carried out without a room to go to"))?;
    let vehicle = going.entity_ref("vehicle gone by")?.cloned();

    world.say(format!("You head {}.", way));
    let mover: EntityId = match vehicle {
        Some(vehicle) => vehicle,
        None => context.actor()?.clone(),
    };
    world.move_to(&mover, &to)?;
    Ok(None)
}

/// The player sees the new room as if looking.
fn describe_room_gone_into(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let actor = context.actor()?;
    if world.player()? != actor {
        return Ok(None);
    }

    let looking = world.action(LOOKING)?;
    let books = looking.rulebooks().clone();
    let look = RuleContext::for_action(actor.clone(), looking.id().clone(), Vec::new());
    for rulebook in [&books.set_variables, &books.check, &books.carry_out, &books.report] {
        if let Some(outcome) = world.follow(rulebook, &look)? {
            return Ok(Some(outcome));
        }
    }
    Ok(None)
}
