//! Rules and rulebooks - the ordered, short-circuiting evaluator.
//!
//! A rulebook holds three tiers of rules: first, main and last. Following a
//! rulebook evaluates the tiers in that order and each tier's rules in their
//! stored order. The first rule to return an [`Outcome`] decides the whole
//! follow; if none does, the follow returns `None` ("no rule decided").
//!
//! Rules may follow other rulebooks through [`World::follow`], which turns a
//! single top-level follow into a call tree. Errors are not isolated: an
//! error from any rule aborts every follow above it.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::entity::EntityId;
use crate::error::{Result, StoryError};
use crate::properties::Value;
use crate::world::World;

/// The result of a rule that decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Succeeded,
    Failed,
    Decided(Value),
}

/// Everything a rule is told about the current attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleContext {
    pub actor: Option<EntityId>,
    pub action: Option<EntityId>,
    pub nouns: Vec<EntityId>,
}

impl RuleContext {
    /// An empty context, for rulebooks that are not about an action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context of an actor attempting an action on some nouns.
    pub fn for_action(actor: EntityId, action: EntityId, nouns: Vec<EntityId>) -> Self {
        Self {
            actor: Some(actor),
            action: Some(action),
            nouns,
        }
    }

    pub fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_action(mut self, action: EntityId) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_nouns(mut self, nouns: Vec<EntityId>) -> Self {
        self.nouns = nouns;
        self
    }

    pub fn actor(&self) -> Result<&EntityId> {
        self.actor
            .as_ref()
            .ok_or_else(|| StoryError::logical("this rule needs an actor"))
    }

    pub fn action(&self) -> Result<&EntityId> {
        self.action
            .as_ref()
            .ok_or_else(|| StoryError::logical("this rule needs an action"))
    }

    pub fn noun(&self, index: usize) -> Result<&EntityId> {
        self.nouns
            .get(index)
            .ok_or_else(|| StoryError::logical(format!("this rule needs noun {}", index + 1)))
    }
}

/// Behaviour of a rule.
pub type RuleBody = Rc<dyn Fn(&mut World, &RuleContext) -> Result<Option<Outcome>>>;

/// One named unit of behaviour.
#[derive(Clone)]
pub struct Rule {
    name: String,
    body: Option<RuleBody>,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&mut World, &RuleContext) -> Result<Option<Outcome>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Some(Rc::new(body)),
        }
    }

    /// A placeholder for behaviour that has not been written yet. It never
    /// decides anything.
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_stub(&self) -> bool {
        self.body.is_none()
    }

    pub fn evaluate(&self, world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
        match &self.body {
            Some(body) => body(world, context),
            None => {
                trace!(rule = %self.name, "not implemented");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("stub", &self.is_stub())
            .finish()
    }
}

/// Which list of a rulebook a rule lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    First,
    Main,
    Last,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::First, Tier::Main, Tier::Last];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::First => "first",
            Tier::Main => "main",
            Tier::Last => "last",
        }
    }
}

/// Where a new rule goes within its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Before every rule already in the tier.
    Head,
    /// After every rule already in the tier.
    #[default]
    Tail,
}

/// An ordered, three-tier sequence of rules.
#[derive(Debug, Clone)]
pub struct Rulebook {
    name: String,
    default_outcome: Option<Outcome>,
    first: Vec<Rule>,
    main: Vec<Rule>,
    last: Vec<Rule>,
}

impl Rulebook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_outcome: None,
            first: Vec::new(),
            main: Vec::new(),
            last: Vec::new(),
        }
    }

    /// Set the outcome used by [`Rulebook::follow_with_default`] when no rule decides.
    pub fn with_default(mut self, outcome: Outcome) -> Self {
        self.default_outcome = Some(outcome);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_outcome(&self) -> Option<&Outcome> {
        self.default_outcome.as_ref()
    }

    pub fn tier(&self, tier: Tier) -> &[Rule] {
        match tier {
            Tier::First => &self.first,
            Tier::Main => &self.main,
            Tier::Last => &self.last,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut Vec<Rule> {
        match tier {
            Tier::First => &mut self.first,
            Tier::Main => &mut self.main,
            Tier::Last => &mut self.last,
        }
    }

    /// Insert a rule into a tier. Names are unique within a tier.
    pub fn insert(&mut self, tier: Tier, rule: Rule, placement: Placement) -> Result<()> {
        if self.tier(tier).iter().any(|r| r.name == rule.name) {
            return Err(StoryError::RuleExists {
                rulebook: self.name.clone(),
                tier: tier.as_str(),
                rule: rule.name,
            });
        }

        debug!(
            rulebook = %self.name,
            rule = %rule.name,
            tier = tier.as_str(),
            ?placement,
            "added rule"
        );
        let rules = self.tier_mut(tier);
        match placement {
            Placement::Head => rules.insert(0, rule),
            Placement::Tail => rules.push(rule),
        }
        Ok(())
    }

    pub fn add_rule(&mut self, rule: Rule, placement: Placement) -> Result<()> {
        self.insert(Tier::Main, rule, placement)
    }

    pub fn add_rule_first(&mut self, rule: Rule, placement: Placement) -> Result<()> {
        self.insert(Tier::First, rule, placement)
    }

    pub fn add_rule_last(&mut self, rule: Rule, placement: Placement) -> Result<()> {
        self.insert(Tier::Last, rule, placement)
    }

    /// Find a rule by name in any tier.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules().find(|r| r.name == name)
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.first.iter().chain(&self.main).chain(&self.last)
    }

    pub fn len(&self) -> usize {
        self.first.len() + self.main.len() + self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate the rules in order until one decides.
    pub fn follow(&self, world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
        debug!(rulebook = %self.name, "following rulebook");

        for rule in self.rules() {
            trace!(rulebook = %self.name, rule = %rule.name, "evaluating rule");
            if let Some(outcome) = rule.evaluate(world, context)? {
                debug!(
                    rulebook = %self.name,
                    rule = %rule.name,
                    ?outcome,
                    "rule decided"
                );
                return Ok(Some(outcome));
            }
        }

        debug!(rulebook = %self.name, "finished rulebook without a decision");
        Ok(None)
    }

    /// Like [`Rulebook::follow`], falling back to the default outcome.
    pub fn follow_with_default(
        &self,
        world: &mut World,
        context: &RuleContext,
    ) -> Result<Option<Outcome>> {
        Ok(self
            .follow(world, context)?
            .or_else(|| self.default_outcome.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::RefCell;

    /// A rule that records its name in `log` and returns `outcome`.
    fn recording(name: &str, log: &Rc<RefCell<Vec<String>>>, outcome: Option<Outcome>) -> Rule {
        let log = Rc::clone(log);
        let label = name.to_string();
        Rule::new(name, move |_, _| {
            log.borrow_mut().push(label.clone());
            Ok(outcome.clone())
        })
    }

    #[test]
    fn test_first_decision_short_circuits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut book = Rulebook::new("test rules");
        book.add_rule(recording("one", &log, None), Placement::Tail).unwrap();
        book.add_rule(recording("two", &log, Some(Outcome::Failed)), Placement::Tail)
            .unwrap();
        book.add_rule(recording("three", &log, Some(Outcome::Succeeded)), Placement::Tail)
            .unwrap();

        let mut world = World::new();
        let outcome = book.follow(&mut world, &RuleContext::new()).unwrap();

        assert_eq!(outcome, Some(Outcome::Failed));
        assert_eq!(*log.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn test_no_decision_returns_none() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut book = Rulebook::new("quiet rules");
        book.add_rule(recording("one", &log, None), Placement::Tail).unwrap();
        book.add_rule_last(recording("two", &log, None), Placement::Tail).unwrap();

        let mut world = World::new();
        assert_eq!(book.follow(&mut world, &RuleContext::new()).unwrap(), None);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_tiers_run_in_order_regardless_of_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut book = Rulebook::new("tiered rules");
        book.add_rule_last(recording("last", &log, None), Placement::Tail).unwrap();
        book.add_rule(recording("main", &log, None), Placement::Tail).unwrap();
        book.add_rule_first(recording("first", &log, None), Placement::Tail).unwrap();

        let mut world = World::new();
        book.follow(&mut world, &RuleContext::new()).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "main", "last"]);
    }

    #[test]
    fn test_head_placement_prepends() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut book = Rulebook::new("placed rules");
        book.add_rule(recording("b", &log, None), Placement::Tail).unwrap();
        book.add_rule(recording("c", &log, None), Placement::Tail).unwrap();
        book.add_rule(recording("a", &log, None), Placement::Head).unwrap();

        let names: Vec<_> = book.rules().map(|r| r.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_rule_names() {
        let mut book = Rulebook::new("strict rules");
        book.add_rule(Rule::stub("check"), Placement::Tail).unwrap();
        let error = book.add_rule(Rule::stub("check"), Placement::Tail).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AlreadyExists);

        // the same name in another tier is fine
        book.add_rule_last(Rule::stub("check"), Placement::Tail).unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_stub_never_decides() {
        let mut book = Rulebook::new("stub rules");
        book.add_rule(Rule::stub("basic visibility rule"), Placement::Tail)
            .unwrap();
        assert!(book.rule("basic visibility rule").unwrap().is_stub());

        let mut world = World::new();
        assert_eq!(book.follow(&mut world, &RuleContext::new()).unwrap(), None);
    }

    #[test]
    fn test_error_aborts_follow() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut book = Rulebook::new("fragile rules");
        book.add_rule(
            Rule::new("breaks", |_, _| Err(StoryError::logical("broken"))),
            Placement::Tail,
        )
        .unwrap();
        book.add_rule(recording("after", &log, Some(Outcome::Succeeded)), Placement::Tail)
            .unwrap();

        let mut world = World::new();
        assert!(book.follow(&mut world, &RuleContext::new()).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_default_outcome() {
        let book = Rulebook::new("empty rules").with_default(Outcome::Succeeded);
        let mut world = World::new();
        let context = RuleContext::new();
        assert_eq!(book.follow(&mut world, &context).unwrap(), None);
        assert_eq!(
            book.follow_with_default(&mut world, &context).unwrap(),
            Some(Outcome::Succeeded)
        );
    }

    #[test]
    fn test_rules_see_context() {
        let mut book = Rulebook::new("context rules");
        book.add_rule(
            Rule::new("echo actor", |_, context| {
                Ok(Some(Outcome::Decided(Value::from(context.actor()?))))
            }),
            Placement::Tail,
        )
        .unwrap();

        let mut world = World::new();
        let context = RuleContext::new().with_actor(EntityId::new("yourself"));
        assert_eq!(
            book.follow(&mut world, &context).unwrap(),
            Some(Outcome::Decided(Value::Entity(EntityId::new("yourself"))))
        );
        assert!(book.follow(&mut world, &RuleContext::new()).is_err());
    }
}
