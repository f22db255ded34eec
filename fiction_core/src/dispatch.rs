//! The action processing state machine.
//!
//! An attempt runs through a fixed chain of stages. Each stage is a rule in
//! one of two rulebooks and advances only while the stage decides nothing:
//!
//! ```text
//! action processing rules
//!   first: set action variables -> before stage -> instead stage
//!   main:  carrying requirements -> basic visibility -> basic accessibility
//!   last:  requested actions require persuasion -> carry out requested actions
//!          -> descend to specific action processing -> end action processing
//!
//! specific action processing rules
//!   first: work out details of specific action processing
//!   main:  awareness before -> check stage -> carry out stage -> after stage
//!          -> awareness after -> report stage
//!   last:  last rule (succeeds)
//! ```
//!
//! Any stage returning an outcome ends the attempt with it; a check rule that
//! fails the action therefore stops carry out and report.

use crate::action::{action_setup, ActionRulebooks, ACTION_KIND};
use crate::error::Result;
use crate::rulebook::{Outcome, Placement, Rule, RuleContext, Rulebook};
use crate::world::World;

pub const ACTION_PROCESSING: &str = "action processing rules";
pub const SPECIFIC_ACTION_PROCESSING: &str = "specific action processing rules";
pub const BEFORE: &str = "before rules";
pub const INSTEAD: &str = "instead rules";
pub const AFTER: &str = "after rules";

/// Declare the action kind and the rulebooks every attempt runs through.
pub fn install(world: &mut World) -> Result<()> {
    world.declare_kind(ACTION_KIND, None, Some(action_setup()))?;
    for name in [BEFORE, INSTEAD, AFTER] {
        world.declare_rulebook(name, None)?;
    }

    let mut processing = Rulebook::new(ACTION_PROCESSING);
    processing.add_rule_first(
        Rule::new("set action variables rule", set_action_variables),
        Placement::Tail,
    )?;
    processing.add_rule_first(Rule::new("before stage rule", before_stage), Placement::Tail)?;
    processing.add_rule_first(
        Rule::new("instead stage rule", |world, context| world.follow(INSTEAD, context)),
        Placement::Tail,
    )?;
    processing.add_rule(Rule::stub("carrying requirements rule"), Placement::Tail)?;
    processing.add_rule(Rule::stub("basic visibility rule"), Placement::Tail)?;
    processing.add_rule(Rule::stub("basic accessibility rule"), Placement::Tail)?;
    processing.add_rule_last(
        Rule::stub("requested actions require persuasion rule"),
        Placement::Tail,
    )?;
    processing.add_rule_last(Rule::stub("carry out requested actions rule"), Placement::Tail)?;
    processing.add_rule_last(
        Rule::new("descend to specific action processing rule", |world, context| {
            world.follow(SPECIFIC_ACTION_PROCESSING, context)
        }),
        Placement::Tail,
    )?;
    processing.add_rule_last(Rule::stub("end action processing rule"), Placement::Tail)?;
    world.add_rulebook(processing)?;

    let mut specific = Rulebook::new(SPECIFIC_ACTION_PROCESSING);
    specific.add_rule_first(
        Rule::new(
            "work out details of specific action processing rule",
            work_out_details,
        ),
        Placement::Tail,
    )?;
    specific.add_rule(
        Rule::stub("investigate player awareness before action rule"),
        Placement::Tail,
    )?;
    specific.add_rule(
        Rule::new("check stage rule", |world, context| {
            follow_own(world, context, |books| &books.check)
        }),
        Placement::Tail,
    )?;
    specific.add_rule(
        Rule::new("carry out stage rule", |world, context| {
            follow_own(world, context, |books| &books.carry_out)
        }),
        Placement::Tail,
    )?;
    specific.add_rule(
        Rule::new("after stage rule", |world, context| world.follow(AFTER, context)),
        Placement::Tail,
    )?;
    specific.add_rule(
        Rule::stub("investigate player awareness after action rule"),
        Placement::Tail,
    )?;
    specific.add_rule(
        Rule::new("report stage rule", |world, context| {
            follow_own(world, context, |books| &books.report)
        }),
        Placement::Tail,
    )?;
    specific.add_rule_last(
        Rule::new("last rule", |_, _| Ok(Some(Outcome::Succeeded))),
        Placement::Tail,
    )?;
    world.add_rulebook(specific)
}

/// Follow one of the rulebooks owned by the action being attempted.
fn follow_own(
    world: &mut World,
    context: &RuleContext,
    pick: impl Fn(&ActionRulebooks) -> &String,
) -> Result<Option<Outcome>> {
    let rulebook = pick(world.action_for(context)?.rulebooks()).clone();
    world.follow(&rulebook, context)
}

fn set_action_variables(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    let actor = context.actor()?.clone();
    let action = world.action_mut(context.action()?.as_str())?;
    action.begin_attempt(actor, context.nouns.clone());
    let rulebook = action.rulebooks().set_variables.clone();
    world.follow(&rulebook, context)
}

fn before_stage(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    if let Some(outcome) = world.follow(BEFORE, context)? {
        return Ok(Some(outcome));
    }
    follow_own(world, context, |books| &books.before)
}

fn work_out_details(world: &mut World, context: &RuleContext) -> Result<Option<Outcome>> {
    world.entity(context.actor()?)?;
    world.action_for(context)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, IdPolicy};
    use crate::properties::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging(name: &str, log: &Log, outcome: Option<Outcome>) -> Rule {
        let log = Rc::clone(log);
        let label = name.to_string();
        Rule::new(name, move |_, _| {
            log.borrow_mut().push(label.clone());
            Ok(outcome.clone())
        })
    }

    fn world() -> (World, EntityId, Log) {
        let mut world = World::new();
        install(&mut world).unwrap();
        world.declare_kind("person", None, None).unwrap();
        let you = world.create("person", "yourself", IdPolicy::Literal).unwrap();
        world.declare_action("jumping", &["jump"], 0).unwrap();
        (world, you, Rc::new(RefCell::new(Vec::new())))
    }

    fn add(world: &mut World, rulebook: &str, rule: Rule) {
        world.add_rule(rulebook, rule, Placement::Tail).unwrap();
    }

    #[test]
    fn test_stages_run_in_order() {
        let (mut world, you, log) = world();
        add(&mut world, "setting jumping action variables rules", logging("set", &log, None));
        add(&mut world, BEFORE, logging("before", &log, None));
        add(&mut world, "before jumping rules", logging("before jumping", &log, None));
        add(&mut world, INSTEAD, logging("instead", &log, None));
        add(&mut world, "check jumping rules", logging("check", &log, None));
        add(&mut world, "carry out jumping rules", logging("carry out", &log, None));
        add(&mut world, AFTER, logging("after", &log, None));
        add(&mut world, "report jumping rules", logging("report", &log, None));

        let outcome = world.try_action(&you, "jumping", Vec::new()).unwrap();

        assert_eq!(outcome, Some(Outcome::Succeeded));
        assert_eq!(
            *log.borrow(),
            vec![
                "set",
                "before",
                "before jumping",
                "instead",
                "check",
                "carry out",
                "after",
                "report"
            ]
        );
    }

    #[test]
    fn test_check_veto_stops_carry_out_and_report() {
        let (mut world, you, log) = world();
        add(
            &mut world,
            "check jumping rules",
            Rule::new("can't jump here rule", |world, _| {
                world.say("You can't jump here.");
                Ok(Some(Outcome::Failed))
            }),
        );
        add(&mut world, "carry out jumping rules", logging("carry out", &log, None));
        add(&mut world, "report jumping rules", logging("report", &log, None));

        let outcome = world.try_action(&you, "jumping", Vec::new()).unwrap();

        assert_eq!(outcome, Some(Outcome::Failed));
        assert_eq!(world.last_message(), "You can't jump here.");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_instead_rule_replaces_the_action() {
        let (mut world, you, log) = world();
        add(
            &mut world,
            INSTEAD,
            Rule::new("instead of jumping rule", |world, _| {
                world.say("You'd rather not.");
                Ok(Some(Outcome::Decided(Value::from("refused"))))
            }),
        );
        add(&mut world, "check jumping rules", logging("check", &log, None));

        let outcome = world.try_action(&you, "jumping", Vec::new()).unwrap();

        assert_eq!(outcome, Some(Outcome::Decided(Value::from("refused"))));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_global_before_runs_before_action_before() {
        let (mut world, you, log) = world();
        add(&mut world, BEFORE, logging("before", &log, Some(Outcome::Failed)));
        add(&mut world, "before jumping rules", logging("before jumping", &log, None));

        let outcome = world.try_action(&you, "jumping", Vec::new()).unwrap();
        assert_eq!(outcome, Some(Outcome::Failed));
        assert_eq!(*log.borrow(), vec!["before"]);
    }

    #[test]
    fn test_error_in_stage_aborts_attempt() {
        let (mut world, you, log) = world();
        add(
            &mut world,
            "carry out jumping rules",
            Rule::new("broken rule", |world, _| {
                world.entity(&EntityId::new("ceiling"))?;
                Ok(None)
            }),
        );
        add(&mut world, "report jumping rules", logging("report", &log, None));

        assert!(world.try_action(&you, "jumping", Vec::new()).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_processing_rulebooks_are_tiered() {
        let (world, _, _) = world();
        let processing = world.rulebook(ACTION_PROCESSING).unwrap();
        assert!(processing.rule("basic visibility rule").unwrap().is_stub());
        assert!(!processing.rule("before stage rule").unwrap().is_stub());
        assert_eq!(processing.len(), 10);

        let specific = world.rulebook(SPECIFIC_ACTION_PROCESSING).unwrap();
        assert_eq!(specific.len(), 8);
    }
}
