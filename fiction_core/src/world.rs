//! The world - the explicit simulation context every rule runs against.
//!
//! A [`World`] owns the kind registry, every entity in insertion order, the
//! global variables, the rulebooks, the actions and the transcript. It is
//! created at session start and passed as `&mut World` into every rule.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::action::Action;
use crate::entity::{Entity, EntityId, IdPolicy};
use crate::error::{Result, StoryError};
use crate::kind::{KindRegistry, Setup};
use crate::properties::Value;
use crate::rulebook::{Outcome, Placement, Rule, RuleContext, Rulebook};

/// The output channel: an append-only sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(|s| s.as_str())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The complete state of a story world.
#[derive(Debug, Default)]
pub struct World {
    kinds: KindRegistry,
    entities: HashMap<EntityId, Entity>,
    /// Entity ids in insertion order.
    order: Vec<EntityId>,
    variables: HashMap<String, Value>,
    rulebooks: HashMap<String, Rulebook>,
    pub(crate) actions: HashMap<String, Action>,
    transcript: Transcript,
    player: Option<EntityId>,
    /// Print every line as it is said.
    echo: bool,
}

impl World {
    /// Create an empty world with no kinds, entities or rulebooks.
    pub fn new() -> Self {
        Self::default()
    }

    // Kinds

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    pub fn declare_kind(
        &mut self,
        name: impl Into<String>,
        base: Option<&str>,
        setup: Option<Setup>,
    ) -> Result<()> {
        self.kinds.declare(name, base, setup)
    }

    /// Build an entity of `kind` without adding it to the world.
    pub fn instantiate(&self, kind: &str, name: &str, policy: IdPolicy) -> Result<Entity> {
        self.kinds.instantiate(kind, name, policy)
    }

    /// Whether the entity's kind is `kind` or derives from it.
    pub fn is_a(&self, id: &EntityId, kind: &str) -> bool {
        self.entities
            .get(id)
            .map(|entity| self.kinds.is_a(entity.kind(), kind))
            .unwrap_or(false)
    }

    // Entities

    /// Instantiate an entity and add it to the world.
    pub fn create(&mut self, kind: &str, name: &str, policy: IdPolicy) -> Result<EntityId> {
        let entity = self.instantiate(kind, name, policy)?;
        self.add(entity)
    }

    pub fn add(&mut self, entity: Entity) -> Result<EntityId> {
        let id = entity.id().clone();
        if self.entities.contains_key(&id) {
            return Err(StoryError::EntityExists(id));
        }

        debug!(entity = %entity.name(), id = %id, kind = %entity.kind(), "added entity");
        self.entities.insert(id.clone(), entity);
        self.order.push(id.clone());
        Ok(id)
    }

    pub fn entity(&self, id: &EntityId) -> Result<&Entity> {
        self.entities
            .get(id)
            .ok_or_else(|| StoryError::UnknownEntity(id.clone()))
    }

    pub fn entity_mut(&mut self, id: &EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id)
            .ok_or_else(|| StoryError::UnknownEntity(id.clone()))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// The first entity added with this display name.
    pub fn find(&self, name: &str) -> Option<&EntityId> {
        self.order
            .iter()
            .find(|id| self.entities.get(*id).map(|e| e.name()) == Some(name))
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Entities tagged with exactly this kind, in insertion order.
    pub fn entities_of_kind(&self, kind: &str) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.kind() == kind)
            .map(|e| e.id().clone())
            .collect()
    }

    pub fn first_of_kind(&self, kind: &str) -> Option<EntityId> {
        self.entities()
            .find(|e| e.kind() == kind)
            .map(|e| e.id().clone())
    }

    // Variables

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    // Rulebooks

    pub fn add_rulebook(&mut self, rulebook: Rulebook) -> Result<()> {
        if self.rulebooks.contains_key(rulebook.name()) {
            return Err(StoryError::RulebookExists(rulebook.name().to_string()));
        }

        debug!(rulebook = %rulebook.name(), "added rulebook");
        self.rulebooks.insert(rulebook.name().to_string(), rulebook);
        Ok(())
    }

    /// Declare an empty rulebook.
    pub fn declare_rulebook(&mut self, name: &str, default_outcome: Option<Outcome>) -> Result<()> {
        let rulebook = match default_outcome {
            Some(outcome) => Rulebook::new(name).with_default(outcome),
            None => Rulebook::new(name),
        };
        self.add_rulebook(rulebook)
    }

    pub fn has_rulebook(&self, name: &str) -> bool {
        self.rulebooks.contains_key(name)
    }

    pub fn rulebook(&self, name: &str) -> Result<&Rulebook> {
        self.rulebooks
            .get(name)
            .ok_or_else(|| StoryError::UnknownRulebook(name.to_string()))
    }

    pub fn rulebook_mut(&mut self, name: &str) -> Result<&mut Rulebook> {
        self.rulebooks
            .get_mut(name)
            .ok_or_else(|| StoryError::UnknownRulebook(name.to_string()))
    }

    pub fn add_rule(&mut self, rulebook: &str, rule: Rule, placement: Placement) -> Result<()> {
        self.rulebook_mut(rulebook)?.add_rule(rule, placement)
    }

    pub fn add_rule_first(&mut self, rulebook: &str, rule: Rule, placement: Placement) -> Result<()> {
        self.rulebook_mut(rulebook)?.add_rule_first(rule, placement)
    }

    pub fn add_rule_last(&mut self, rulebook: &str, rule: Rule, placement: Placement) -> Result<()> {
        self.rulebook_mut(rulebook)?.add_rule_last(rule, placement)
    }

    /// Follow a rulebook by name.
    ///
    /// The rulebook is snapshotted first, so rules it runs may add rules to
    /// it; those take effect the next time it is followed.
    pub fn follow(&mut self, rulebook: &str, context: &RuleContext) -> Result<Option<Outcome>> {
        let snapshot = self.rulebook(rulebook)?.clone();
        snapshot.follow(self, context)
    }

    pub fn follow_with_default(
        &mut self,
        rulebook: &str,
        context: &RuleContext,
    ) -> Result<Option<Outcome>> {
        let snapshot = self.rulebook(rulebook)?.clone();
        snapshot.follow_with_default(self, context)
    }

    // Output

    /// Append a line to the transcript.
    pub fn say(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{}", line);
        }
        self.transcript.push(line);
    }

    /// The most recent line said, or an empty string.
    pub fn last_message(&self) -> &str {
        self.transcript.last().unwrap_or("")
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    // Player and locations

    pub fn player(&self) -> Result<&EntityId> {
        self.player
            .as_ref()
            .ok_or_else(|| StoryError::logical("the world has no player"))
    }

    pub fn set_player(&mut self, id: &EntityId) -> Result<()> {
        self.entity(id)?;
        self.player = Some(id.clone());
        Ok(())
    }

    /// Where an entity is, `None` when it is nowhere.
    pub fn location_of(&self, id: &EntityId) -> Result<Option<EntityId>> {
        Ok(self.entity(id)?.entity_ref("location")?.cloned())
    }

    pub fn move_to(&mut self, id: &EntityId, location: &EntityId) -> Result<()> {
        self.entity(location)?;
        let entity = self.entity_mut(id)?;
        debug!(entity = %entity.name(), to = %location, "moved entity");
        entity.set("location", location)
    }
}
