//! The authoring API.
//!
//! A [`Story`] owns a [`World`] populated with the standard rules and offers
//! the helpers an author writes a story with:
//!
//! ```ignore
//! let mut story = Story::standard()?;
//! story.title("Bic");
//! story.room("Staff Break Room", None)?;
//! let napkin = story.thing("napkin", Some("Slightly crumpled"))?;
//! story.now_player_carries(&[&napkin])?;
//! story.go()?;
//! ```

use fiction_core::{
    dispatch, EntityId, IdPolicy, Outcome, Placement, Result, Rule, RuleContext, Setup, Value,
    World,
};
use tracing::{debug, info};

use crate::actions::declare_standard_actions;
use crate::config::StoryConfig;
use crate::directions::{add_direction, declare_directions};
use crate::kinds::{declare_standard_kinds, PERSON, ROOM, THING};
use crate::map::make_map_connections;
use crate::rulebooks::{declare_standard_rulebooks, WHEN_PLAY_BEGINS};

/// One scripted action attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub action: String,
    pub nouns: Vec<EntityId>,
}

impl Step {
    pub fn new(action: impl Into<String>, nouns: Vec<EntityId>) -> Self {
        Self {
            action: action.into(),
            nouns,
        }
    }
}

impl From<&str> for Step {
    fn from(action: &str) -> Self {
        Self::new(action, Vec::new())
    }
}

/// A story under construction or in play.
#[derive(Debug)]
pub struct Story {
    world: World,
}

impl Story {
    /// A world with the standard kinds, directions, rulebooks, actions and
    /// the player.
    pub fn standard() -> Result<Self> {
        let mut world = World::new();
        dispatch::install(&mut world)?;
        declare_standard_kinds(&mut world)?;
        declare_directions(&mut world)?;
        declare_standard_rulebooks(&mut world)?;
        declare_standard_actions(&mut world)?;

        let you = world.create(PERSON, "yourself", IdPolicy::Literal)?;
        let yourself = world.entity_mut(&you)?;
        yourself.now("undescribed")?;
        yourself.now("proper-named")?;
        yourself.set("description", "As good-looking as ever")?;
        world.set_player(&you)?;

        world.set_variable("title", "");
        world.set_variable("turn count", 0);
        world.set_variable("command prompt", ">");

        debug!("built the standard rules");
        Ok(Self { world })
    }

    /// The standard rules with configuration applied.
    pub fn with_config(config: &StoryConfig) -> Result<Self> {
        let mut story = Self::standard()?;
        if let Some(title) = &config.title {
            story.title(title);
        }
        story
            .world
            .set_variable("command prompt", config.command_prompt.as_str());
        story.world.set_echo(config.echo);
        Ok(story)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn title(&mut self, title: &str) {
        self.world.set_variable("title", title);
    }

    // Declarations

    pub fn kind(&mut self, name: &str, base: Option<&str>, setup: Option<Setup>) -> Result<()> {
        self.world.declare_kind(name, base, setup)
    }

    /// Create an entity of any kind.
    pub fn object(&mut self, kind: &str, name: &str) -> Result<EntityId> {
        self.world.create(kind, name, IdPolicy::Generated)
    }

    /// Create a room. Without a description it reads "It's the <name>.".
    pub fn room(&mut self, name: &str, description: Option<&str>) -> Result<EntityId> {
        let room = self.object(ROOM, name)?;
        if let Some(description) = description {
            self.set(&room, "description", description)?;
        }
        Ok(room)
    }

    pub fn thing(&mut self, name: &str, description: Option<&str>) -> Result<EntityId> {
        let thing = self.object(THING, name)?;
        if let Some(description) = description {
            self.set(&thing, "description", description)?;
        }
        Ok(thing)
    }

    pub fn person(&mut self, name: &str) -> Result<EntityId> {
        self.object(PERSON, name)
    }

    pub fn direction(&mut self, name: &str, short_name: Option<&str>) -> Result<EntityId> {
        add_direction(&mut self.world, name, short_name)
    }

    pub fn action(&mut self, name: &str, understand_as: &[&str], applies_to: usize) -> Result<EntityId> {
        self.world.declare_action(name, understand_as, applies_to)
    }

    /// Write a property of an entity.
    pub fn set(&mut self, id: &EntityId, property: &str, value: impl Into<Value>) -> Result<()> {
        self.world.entity_mut(id)?.set(property, value)
    }

    /// Place a room relative to others, as in "the Chamber is south of the Awning".
    pub fn connect(&mut self, room: &EntityId, bearings: &[(&str, &EntityId)]) -> Result<()> {
        make_map_connections(&mut self.world, room, bearings)
    }

    pub fn add_rule(&mut self, rulebook: &str, rule: Rule, placement: Placement) -> Result<()> {
        self.world.add_rule(rulebook, rule, placement)
    }

    pub fn when_play_begins(&mut self, rule: Rule, placement: Placement) -> Result<()> {
        self.add_rule(WHEN_PLAY_BEGINS, rule, placement)
    }

    // Play

    pub fn player(&self) -> Result<EntityId> {
        self.world.player().cloned()
    }

    pub fn now_player_carries(&mut self, things: &[&EntityId]) -> Result<()> {
        let player = self.player()?;
        for thing in things {
            self.world.move_to(thing, &player)?;
        }
        Ok(())
    }

    /// The player attempts an action.
    pub fn try_action(&mut self, action: &str, nouns: Vec<EntityId>) -> Result<Option<Outcome>> {
        let player = self.player()?;
        self.actor_try_action(&player, action, nouns)
    }

    pub fn actor_try_action(
        &mut self,
        actor: &EntityId,
        action: &str,
        nouns: Vec<EntityId>,
    ) -> Result<Option<Outcome>> {
        self.world.try_action(actor, action, nouns)
    }

    /// Start play by following the when play begins rules.
    pub fn go(&mut self) -> Result<Option<Outcome>> {
        info!("play begins");
        self.world.follow(WHEN_PLAY_BEGINS, &RuleContext::new())
    }

    /// Run a script of player actions, announcing each step in the transcript.
    pub fn test_with_actions(&mut self, script: &[Step]) -> Result<Vec<Option<Outcome>>> {
        let mut outcomes = Vec::with_capacity(script.len());
        for (i, step) in script.iter().enumerate() {
            let mut announcement = format!("TEST {}: {}", i, step.action);
            for noun in &step.nouns {
                announcement.push(' ');
                announcement.push_str(self.world.entity(noun)?.name());
            }
            info!(step = i, action = %step.action, "running scripted action");
            self.world.say(announcement);
            self.world.say("---");

            outcomes.push(self.try_action(&step.action, step.nouns.clone())?);
            self.advance_turn();
        }
        Ok(outcomes)
    }

    fn advance_turn(&mut self) {
        let turns = self
            .world
            .variable("turn count")
            .and_then(|turns| turns.as_number())
            .unwrap_or(0);
        self.world.set_variable("turn count", turns + 1);
    }

    pub fn last_message(&self) -> &str {
        self.world.last_message()
    }

    /// Entities whose kind is exactly "thing".
    pub fn things(&self) -> Vec<EntityId> {
        self.world.entities_of_kind(THING)
    }
}
