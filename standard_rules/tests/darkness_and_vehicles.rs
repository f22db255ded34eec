//! Looking in the dark, rooms nobody described, and driving between rooms.

use fiction_core::{EntityId, Outcome};
use standard_rules::{Story, LOOKING, ROOM, VEHICLE};

/// The player sits in a car parked on the Road; the Town lies north.
fn road_trip() -> (Story, EntityId, EntityId, EntityId) {
    let mut story = Story::standard().unwrap();
    story.title("Road Trip");
    let road = story.room("Road", None).unwrap();
    let town = story.room("Town", None).unwrap();
    story.connect(&town, &[("north", &road)]).unwrap();

    let car = story.object(VEHICLE, "car").unwrap();
    story.set(&car, "location", &road).unwrap();
    let you = story.player().unwrap();
    story.set(&you, "location", &car).unwrap();
    (story, road, town, car)
}

fn looking_state(story: &Story) -> (Option<EntityId>, i64) {
    let world = story.world();
    let look = world.entity(world.action(LOOKING).unwrap().id()).unwrap();
    (
        look.entity_ref("visibility ceiling").unwrap().cloned(),
        look.number("visibility level count").unwrap(),
    )
}

#[test]
fn test_undescribed_room_still_has_a_body() {
    let mut story = Story::standard().unwrap();
    story.object(ROOM, "Void").unwrap();
    story.go().unwrap();

    let lines = story.world().transcript().lines();
    assert_eq!(lines, ["-------", "-------", "Void", "It's the Void."]);
}

#[test]
fn test_blank_description_prints_a_blank_body() {
    let mut story = Story::standard().unwrap();
    let void = story.room("Void", None).unwrap();
    story.set(&void, "description", "").unwrap();
    story.go().unwrap();

    let lines = story.world().transcript().lines();
    assert_eq!(lines[2..], ["Void", ""]);
}

#[test]
fn test_dark_room() {
    let mut story = Story::standard().unwrap();
    story.title("Cellar");
    let cellar = story.room("Cellar", Some("Damp stone steps lead up.")).unwrap();
    story.world_mut().entity_mut(&cellar).unwrap().now("dark").unwrap();
    let crate_ = story.thing("crate", Some("Slatted pine.")).unwrap();
    story.set(&crate_, "location", &cellar).unwrap();
    story.go().unwrap();

    let lines = story.world().transcript().lines();
    assert_eq!(
        lines[3..],
        ["Darkness", "It is pitch dark, and you can't see a thing."]
    );
    let world = story.world();
    assert!(world.entity(&cellar).unwrap().is("unvisited").unwrap());
    assert_eq!(looking_state(&story), (Some(cellar), 0));
}

#[test]
fn test_looking_from_inside_a_vehicle_describes_the_room() {
    let (mut story, road, _, _) = road_trip();
    story.go().unwrap();

    let lines = story.world().transcript().lines();
    assert_eq!(lines[3..], ["Road", "It's the Road."]);
    assert!(story.world().entity(&road).unwrap().is("visited").unwrap());
    assert!(!lines.iter().any(|line| line.contains("car")));
    assert_eq!(looking_state(&story), (Some(road), 2));
}

#[test]
fn test_going_by_vehicle() {
    let (mut story, _, town, car) = road_trip();
    story.go().unwrap();

    let outcome = story
        .try_action("going", vec![EntityId::new("north")])
        .unwrap();
    assert_eq!(outcome, Some(Outcome::Succeeded));

    let lines = story.world().transcript().lines();
    assert_eq!(
        lines[lines.len() - 3..],
        ["You head north.", "Town", "It's the Town."]
    );

    let world = story.world();
    let you = story.player().unwrap();
    assert_eq!(world.location_of(&you).unwrap(), Some(car.clone()));
    assert_eq!(world.location_of(&car).unwrap(), Some(town.clone()));
    assert!(world.entity(&town).unwrap().is("visited").unwrap());

    let going = world.entity(world.action("going").unwrap().id()).unwrap();
    assert_eq!(going.entity_ref("vehicle gone by").unwrap(), Some(&car));
}
