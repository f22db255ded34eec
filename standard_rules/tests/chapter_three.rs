//! Worked stories: checking properties at the start of play, and a two-room
//! map walked through with a script.

use fiction_core::{EntityId, Outcome, Placement, Rule};
use standard_rules::{add_map_connection, connection, Connect, Step, Story, THING};

const AWNING: &str = "A tan awning is stretched on tent poles over the dig-site, providing a \
    little shade to the workers here; you are at the bottom of a square twenty feet on a side, \
    marked out with pegs and lines of string. Uncovered in the south face of this square is an \
    awkward opening into the earth.";

fn flag_missing_descriptions() -> Rule {
    Rule::new(
        "run through property checks at the start of play rule",
        |world, _| {
            let mut missing = Vec::new();
            for id in world.entities_of_kind(THING) {
                let thing = world.entity(&id)?;
                if thing.text("description")?.is_empty() {
                    missing.push(format!("{} has no description.", thing.name()));
                }
            }
            for line in missing {
                world.say(line);
            }
            Ok(None)
        },
    )
}

fn slightly_wrong() -> (Story, EntityId, EntityId) {
    let mut story = Story::standard().unwrap();
    story.title("Slightly Wrong");
    let awning = story.room("Awning", Some(AWNING)).unwrap();
    let chamber = story.room("Slightly Wrong Chamber", None).unwrap();
    story.connect(&chamber, &[("south", &awning)]).unwrap();
    (story, awning, chamber)
}

#[test]
fn test_missing_descriptions_are_flagged() {
    let mut story = Story::standard().unwrap();
    story.title("Bic");
    story
        .when_play_begins(flag_missing_descriptions(), Placement::Head)
        .unwrap();

    story.room("Staff Break Room", None).unwrap();
    let orange = story
        .thing(
            "orange",
            Some(
                "It's a small hard pinch-skinned thing from the lunch room, probably with lots \
                 of pips and no juice.",
            ),
        )
        .unwrap();
    let pen = story.thing("Bic pen", None).unwrap();
    let napkin = story.thing("napkin", Some("Slightly crumpled")).unwrap();
    story.now_player_carries(&[&orange, &pen, &napkin]).unwrap();

    story.go().unwrap();

    assert_eq!(story.last_message(), "Bic pen has no description.");
    let flagged: Vec<_> = story
        .world()
        .transcript()
        .lines()
        .iter()
        .filter(|line| line.ends_with("has no description."))
        .collect();
    assert_eq!(flagged, vec!["Bic pen has no description."]);
}

#[test]
fn test_south_of_synthesizes_north() {
    let (story, awning, chamber) = slightly_wrong();
    let world = story.world();

    assert_eq!(
        connection(world, &awning, &EntityId::new("south")).unwrap(),
        Some(chamber.clone())
    );
    assert_eq!(
        connection(world, &chamber, &EntityId::new("north")).unwrap(),
        Some(awning)
    );
}

#[test]
fn test_soft_reverse_does_not_overwrite() {
    let (mut story, awning, chamber) = slightly_wrong();
    let trench = story.room("Trench", None).unwrap();

    let added = add_map_connection(
        story.world_mut(),
        &chamber,
        &trench,
        &EntityId::new("north"),
        Connect::Soft,
    )
    .unwrap();

    assert!(!added);
    assert_eq!(
        connection(story.world(), &chamber, &EntityId::new("north")).unwrap(),
        Some(awning)
    );
}

#[test]
fn test_first_look_is_heading_then_body() {
    let (mut story, _, _) = slightly_wrong();
    let before = story.world().transcript().len();
    story.go().unwrap();

    let lines = &story.world().transcript().lines()[before..];
    assert_eq!(lines[..3], ["-------", "Slightly Wrong", "-------"]);
    assert_eq!(lines[3], "Awning");
    assert_eq!(lines[4], AWNING);
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_objects_are_listed_after_the_description() {
    let (mut story, awning, _) = slightly_wrong();
    let trowel = story.thing("trowel", None).unwrap();
    let sieve = story.thing("sieve", None).unwrap();
    let tent_poles = story.thing("tent poles", None).unwrap();
    for thing in [&trowel, &sieve, &tent_poles] {
        story.set(thing, "location", &awning).unwrap();
    }
    story.set(&tent_poles, "scenery", true).unwrap();
    story.go().unwrap();

    let lines = story.world().transcript().lines();
    assert_eq!(lines[lines.len() - 2], AWNING);
    assert_eq!(story.last_message(), "You can see a trowel and a sieve here.");
}

#[test]
fn test_scripted_walk() {
    let (mut story, awning, chamber) = slightly_wrong();
    story.go().unwrap();

    let outcomes = story
        .test_with_actions(&[
            Step::from("looking"),
            Step::new("going", vec![EntityId::new("south")]),
            Step::from("looking"),
        ])
        .unwrap();
    assert_eq!(outcomes, vec![Some(Outcome::Succeeded); 3]);

    let lines = story.world().transcript().lines();
    let going = lines
        .iter()
        .position(|line| line == "TEST 1: going south")
        .unwrap();
    assert_eq!(lines[going + 1], "---");
    assert_eq!(lines[going + 2], "You head south.");
    assert_eq!(lines[going + 3], "Slightly Wrong Chamber");
    assert_eq!(lines[going + 4], "It's the Slightly Wrong Chamber.");
    assert_eq!(story.last_message(), "It's the Slightly Wrong Chamber.");

    let you = story.player().unwrap();
    assert_eq!(story.world().location_of(&you).unwrap(), Some(chamber.clone()));
    let world = story.world();
    assert!(world.entity(&chamber).unwrap().is("visited").unwrap());
    assert!(world.entity(&awning).unwrap().is("visited").unwrap());
}

#[test]
fn test_going_nowhere_fails() {
    let (mut story, awning, _) = slightly_wrong();
    story.go().unwrap();

    let outcome = story
        .try_action("going", vec![EntityId::new("east")])
        .unwrap();

    assert_eq!(outcome, Some(Outcome::Failed));
    assert_eq!(story.last_message(), "You can't go that way.");
    let you = story.player().unwrap();
    assert_eq!(story.world().location_of(&you).unwrap(), Some(awning));
}

#[test]
fn test_other_people_look_around() {
    let (mut story, awning, _) = slightly_wrong();
    let bob = story.person("Bob").unwrap();
    story.set(&bob, "location", &awning).unwrap();
    story.go().unwrap();

    story.actor_try_action(&bob, "looking", Vec::new()).unwrap();
    assert_eq!(story.last_message(), "Bob looks around.");
}
