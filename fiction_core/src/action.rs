//! Actions - verbs an actor can attempt, each owning its own rulebooks.

use tracing::debug;

use crate::dispatch;
use crate::entity::{EntityId, IdPolicy};
use crate::error::{Result, StoryError};
use crate::kind::{setup, Setup};
use crate::properties::Value;
use crate::rulebook::{Outcome, RuleContext, Rulebook};
use crate::world::World;

/// Kind tag of every action entity.
pub const ACTION_KIND: &str = "action";

/// Setup of the action kind.
pub fn action_setup() -> Setup {
    setup(|action| action.has("applies to", 0))
}

/// Names of the rulebooks an action owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRulebooks {
    pub set_variables: String,
    pub before: String,
    pub check: String,
    pub carry_out: String,
    pub report: String,
}

impl ActionRulebooks {
    pub fn for_action(name: &str) -> Self {
        Self {
            set_variables: format!("setting {} action variables rules", name),
            before: format!("before {} rules", name),
            check: format!("check {} rules", name),
            carry_out: format!("carry out {} rules", name),
            report: format!("report {} rules", name),
        }
    }

    pub fn names(&self) -> [&str; 5] {
        [
            self.set_variables.as_str(),
            self.before.as_str(),
            self.check.as_str(),
            self.carry_out.as_str(),
            self.report.as_str(),
        ]
    }
}

/// A declared action and the state of its current attempt.
#[derive(Debug, Clone)]
pub struct Action {
    id: EntityId,
    name: String,
    applies_to: usize,
    rulebooks: ActionRulebooks,
    current_actor: Option<EntityId>,
    current_nouns: Vec<EntityId>,
}

impl Action {
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nouns the action takes.
    pub fn applies_to(&self) -> usize {
        self.applies_to
    }

    pub fn rulebooks(&self) -> &ActionRulebooks {
        &self.rulebooks
    }

    pub fn current_actor(&self) -> Option<&EntityId> {
        self.current_actor.as_ref()
    }

    pub fn current_nouns(&self) -> &[EntityId] {
        &self.current_nouns
    }

    pub(crate) fn begin_attempt(&mut self, actor: EntityId, nouns: Vec<EntityId>) {
        self.current_actor = Some(actor);
        self.current_nouns = nouns;
    }
}

impl World {
    /// Declare an action: an entity of the action kind named literally, plus
    /// its five rulebooks.
    pub fn declare_action(
        &mut self,
        name: &str,
        understand_as: &[&str],
        applies_to: usize,
    ) -> Result<EntityId> {
        if self.actions.contains_key(name) {
            return Err(StoryError::ActionExists(name.to_string()));
        }
        let rulebooks = ActionRulebooks::for_action(name);
        if let Some(taken) = rulebooks.names().into_iter().find(|n| self.has_rulebook(n)) {
            return Err(StoryError::RulebookExists(taken.to_string()));
        }

        let mut entity = self.instantiate(ACTION_KIND, name, IdPolicy::Literal)?;
        entity.set("understand as", Value::text_list(understand_as.iter().copied()))?;
        entity.set("applies to", applies_to as i64)?;
        let id = self.add(entity)?;

        for rulebook in rulebooks.names() {
            self.add_rulebook(Rulebook::new(rulebook))?;
        }
        self.actions.insert(
            name.to_string(),
            Action {
                id: id.clone(),
                name: name.to_string(),
                applies_to,
                rulebooks,
                current_actor: None,
                current_nouns: Vec::new(),
            },
        );

        debug!(action = %name, applies_to, "declared action");
        Ok(id)
    }

    pub fn action(&self, name: &str) -> Result<&Action> {
        self.actions
            .get(name)
            .ok_or_else(|| StoryError::UnknownAction(name.to_string()))
    }

    pub fn action_mut(&mut self, name: &str) -> Result<&mut Action> {
        self.actions
            .get_mut(name)
            .ok_or_else(|| StoryError::UnknownAction(name.to_string()))
    }

    /// The action a rule is running for.
    pub fn action_for(&self, context: &RuleContext) -> Result<&Action> {
        self.action(context.action()?.as_str())
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    /// Have `actor` attempt an action on `nouns`, running the whole action
    /// processing chain.
    pub fn try_action(
        &mut self,
        actor: &EntityId,
        action: &str,
        nouns: Vec<EntityId>,
    ) -> Result<Option<Outcome>> {
        let (id, applies_to) = {
            let action = self.action(action)?;
            (action.id.clone(), action.applies_to)
        };
        if nouns.len() != applies_to {
            return Err(StoryError::logical(format!(
                "{} applies to {} nouns, not {}",
                action,
                applies_to,
                nouns.len()
            )));
        }
        self.entity(actor)?;
        for noun in &nouns {
            self.entity(noun)?;
        }

        debug!(actor = %actor, action, "trying action");
        let context = RuleContext::for_action(actor.clone(), id, nouns);
        let outcome = self.follow(dispatch::ACTION_PROCESSING, &context)?;
        debug!(actor = %actor, action, ?outcome, "finished trying action");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rulebook::{Placement, Rule};

    fn world() -> World {
        let mut world = World::new();
        dispatch::install(&mut world).unwrap();
        world
            .declare_kind(
                "thing",
                None,
                Some(setup(|thing| thing.has("location", Value::Nothing))),
            )
            .unwrap();
        world
    }

    #[test]
    fn test_declare_action() {
        let mut world = world();
        let id = world.declare_action("taking", &["take", "get"], 1).unwrap();

        assert_eq!(id.as_str(), "taking");
        let entity = world.entity(&id).unwrap();
        assert_eq!(entity.kind(), ACTION_KIND);
        assert_eq!(entity.number("applies to").unwrap(), 1);
        assert_eq!(entity.list("understand as").unwrap().len(), 2);

        for rulebook in world.action("taking").unwrap().rulebooks().names() {
            assert!(world.has_rulebook(rulebook), "missing {}", rulebook);
        }
        assert!(world.has_rulebook("setting taking action variables rules"));
        assert!(world.has_rulebook("carry out taking rules"));
    }

    #[test]
    fn test_duplicate_action() {
        let mut world = world();
        world.declare_action("waiting", &["wait", "z"], 0).unwrap();
        let error = world.declare_action("waiting", &["wait"], 0).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_unknown_action() {
        let mut world = world();
        let you = world.create("thing", "yourself", IdPolicy::Literal).unwrap();
        let error = world.try_action(&you, "dancing", Vec::new()).unwrap_err();
        assert!(matches!(error, StoryError::UnknownAction(ref a) if a == "dancing"));
    }

    #[test]
    fn test_noun_count_must_match() {
        let mut world = world();
        let you = world.create("thing", "yourself", IdPolicy::Literal).unwrap();
        world.declare_action("taking", &["take"], 1).unwrap();

        let error = world.try_action(&you, "taking", Vec::new()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Logical);
    }

    #[test]
    fn test_attempt_records_actor_and_nouns() {
        let mut world = world();
        let you = world.create("thing", "yourself", IdPolicy::Literal).unwrap();
        let pen = world.create("thing", "Bic pen", IdPolicy::Generated).unwrap();
        world.declare_action("taking", &["take"], 1).unwrap();
        world
            .add_rule(
                "carry out taking rules",
                Rule::new("standard taking rule", |world, context| {
                    let actor = context.actor()?.clone();
                    world.move_to(context.noun(0)?, &actor)?;
                    Ok(None)
                }),
                Placement::Tail,
            )
            .unwrap();

        let outcome = world.try_action(&you, "taking", vec![pen.clone()]).unwrap();
        assert_eq!(outcome, Some(Outcome::Succeeded));

        let taking = world.action("taking").unwrap();
        assert_eq!(taking.current_actor(), Some(&you));
        assert_eq!(taking.current_nouns(), &[pen.clone()]);
        assert_eq!(world.location_of(&pen).unwrap(), Some(you));
    }
}
