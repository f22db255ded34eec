//! The when play begins rulebook.

use fiction_core::{Outcome, Placement, Result, Rule, RuleContext, StoryError, World};

use crate::actions::LOOKING;
use crate::kinds::ROOM;

pub const WHEN_PLAY_BEGINS: &str = "when play begins rules";

/// Declare the standard rulebooks that are not part of action processing.
pub fn declare_standard_rulebooks(world: &mut World) -> Result<()> {
    world.declare_rulebook(WHEN_PLAY_BEGINS, None)?;

    world.add_rule_first(
        WHEN_PLAY_BEGINS,
        Rule::new("display banner rule", |world, _| {
            let title = world
                .variable("title")
                .and_then(|title| title.as_text())
                .unwrap_or_default()
                .to_string();
            world.say("-------");
            if !title.is_empty() {
                world.say(title);
            }
            world.say("-------");
            Ok(None)
        }),
        Placement::Tail,
    )?;
    world.add_rule_first(
        WHEN_PLAY_BEGINS,
        Rule::new("position player in model world rule", position_player),
        Placement::Tail,
    )?;
    world.add_rule_first(
        WHEN_PLAY_BEGINS,
        Rule::new("initial room description rule", |world, _| {
            let player = world.player()?.clone();
            world.try_action(&player, LOOKING, Vec::new())?;
            Ok(None)
        }),
        Placement::Tail,
    )
}

/// Start the player in the first room made, unless the story placed them.
fn position_player(world: &mut World, _: &RuleContext) -> Result<Option<Outcome>> {
    let player = world.player()?.clone();
    if world.location_of(&player)?.is_some() {
        return Ok(None);
    }
    let room = world
        .first_of_kind(ROOM)
        .ok_or_else(|| StoryError::logical("the story has no rooms to start in"))?;
    world.move_to(&player, &room)?;
    Ok(None)
}
