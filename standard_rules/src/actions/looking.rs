//! Looking - describing the room the actor is in.

use fiction_core::{
    Entity, EntityId, Outcome, Placement, Result, Rule, RuleContext, StoryError, Value, World,
};

use crate::kinds::{ROOM, THING};

pub const LOOKING: &str = "looking";

pub fn declare_looking(world: &mut World) -> Result<()> {
    let id = world.declare_action(LOOKING, &["look", "l"], 0)?;
    let look = world.entity_mut(&id)?;
    look.has("room describing action", "look")?;
    look.has("visibility level count", 0)?;
    look.has("visibility ceiling", Value::Nothing)?;

    let books = world.action(LOOKING)?.rulebooks().clone();
    world.add_rule(
        &books.set_variables,
        Rule::new("determine visibility ceiling rule", determine_visibility_ceiling),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.carry_out,
        Rule::new("room description heading rule", room_description_heading),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.carry_out,
        Rule::new("room description body rule", room_description_body),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.carry_out,
        Rule::new(
            "room description paragraphs about objects rule",
            room_description_paragraphs,
        ),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.carry_out,
        Rule::new("check new arrival rule", check_new_arrival),
        Placement::Tail,
    )?;
    world.add_rule(
        &books.report,
        Rule::new("other people looking rule", other_people_looking),
        Placement::Tail,
    )
}

/// The entity the actor is in.
fn actor_location(world: &World, actor: &EntityId) -> Result<EntityId> {
    world.location_of(actor)?.ok_or_else(|| {
        StoryError::logical(format!("{} is nowhere and cannot look around", actor))
    })
}

/// Whether light reaches inside `place`. Only rooms can be dark.
fn is_lit(world: &World, place: &EntityId) -> Result<bool> {
    let place = world.entity(place)?;
    Ok(!place.has_property("lighted") || place.is("lighted")?)
}

/// The outermost holder around the actor: the room, seen through any
/// vehicles, containers or supporters the actor is in. Also returns every
/// holder passed on the way, innermost first.
pub fn enclosing_room(world: &World, actor: &EntityId) -> Result<(EntityId, Vec<EntityId>)> {
    let mut place = actor_location(world, actor)?;
    let mut holders = Vec::new();
    while !world.is_a(&place, ROOM) {
        let Some(outer) = world.location_of(&place)? else {
            break;
        };
        if outer == *actor || holders.contains(&outer) || outer == place {
            return Err(StoryError::logical(format!("{} is inside itself", place)));
        }
        holders.push(place);
        place = outer;
    }
    Ok((place, holders))
}

/// The ceiling recorded by the set variables stage.
fn ceiling(world: &World, context: &RuleContext) -> Result<EntityId> {
    world
        .entity(context.action()?)?
        .entity_ref("visibility ceiling")?
        .cloned()
        .ok_or_else(|| StoryError::logical("looking was carried out without a visibility ceiling"))
}

fn determine_visibility_ceiling(
    world: &mut World,
    context: &RuleContext,
) -> Result<Option<Outcome>> {
    let (ceiling, holders) = enclosing_room(world, context.actor()?)?;
    let levels = if is_lit(world, &ceiling)? {
        holders.len() as i64 + 1
    } else {
        0
    };
    let look = world.entity_mut(context.action()?)?;
    look.set("visibility ceiling", &ceiling)?;
    look.set("visibility level count", levels)?;
    Ok(None)
}

fn room_description_heading(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let location = ceiling(world, context)?;
    let heading = if is_lit(world, &location)? {
        world.entity(&location)?.name().to_string()
    } else {
        "Darkness".to_string()
    };
    world.say(heading);
    Ok(None)
}

fn room_description_body(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let location = ceiling(world, context)?;
    let body = if is_lit(world, &location)? {
        world.entity(&location)?.text("description")?.to_string()
    } else {
        "It is pitch dark, and you can't see a thing.".to_string()
    };
    world.say(body);
    Ok(None)
}

fn room_description_paragraphs(
    world: &mut World,
    context: &RuleContext,
) -> Result<Option<Outcome>> {
    let actor = context.actor()?;
    let location = ceiling(world, context)?;
    if !is_lit(world, &location)? {
        return Ok(None);
    }
    let (_, holders) = enclosing_room(world, actor)?;

    let mut listed = Vec::new();
    for entity in world.entities() {
        if entity.id() == actor || holders.contains(entity.id()) || !world.is_a(entity.id(), THING) {
            continue;
        }
        if entity.entity_ref("location")? != Some(&location) {
            continue;
        }
        if entity.is("mentioned")? && entity.is("described")? && !entity.is("scenery")? {
            listed.push(indefinite_name(entity)?);
        }
    }

    if !listed.is_empty() {
        world.say(format!("You can see {} here.", list_phrase(&listed)));
    }
    Ok(None)
}

fn check_new_arrival(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let location = ceiling(world, context)?;
    if world.is_a(&location, ROOM) && is_lit(world, &location)? {
        world.entity_mut(&location)?.now("visited")?;
    }
    Ok(None)
}

fn other_people_looking(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let actor = context.actor()?;
    if world.player()? != actor {
        let name = world.entity(actor)?.name().to_string();
        world.say(format!("{} looks around.", name));
    }
    Ok(None)
}

/// The name of an entity with its indefinite article, as in "a napkin".
pub fn indefinite_name(entity: &Entity) -> Result<String> {
    let name = entity.name();
    let article = entity.text("indefinite article")?;
    if !article.is_empty() {
        return Ok(format!("{} {}", article, name));
    }
    if entity.is("proper-named")? {
        return Ok(name.to_string());
    }
    if entity.is("plural-named")? {
        return Ok(format!("some {}", name));
    }

    let vowel = name
        .chars()
        .next()
        .map(|c| "aeiou".contains(c.to_ascii_lowercase()))
        .unwrap_or(false);
    Ok(format!("{} {}", if vowel { "an" } else { "a" }, name))
}

/// Join items as "a, b and c".
pub fn list_phrase(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
