//! The standard kinds and their setups.
//!
//! Derived kinds only declare what they add; [`fiction_core::KindRegistry`]
//! runs the base setup first.

use fiction_core::{setup, Qualifier, Relation, Result, Value, World};

pub const ROOM: &str = "room";
pub const THING: &str = "thing";
pub const DIRECTION: &str = "direction";
pub const DOOR: &str = "door";
pub const CONTAINER: &str = "container";
pub const SUPPORTER: &str = "supporter";
pub const BACKDROP: &str = "backdrop";
pub const BEING: &str = "being";
pub const PERSON: &str = "person";
pub const MAN: &str = "man";
pub const WOMAN: &str = "woman";
pub const ANIMAL: &str = "animal";
pub const REGION: &str = "region";
pub const DEVICE: &str = "device";
pub const VEHICLE: &str = "vehicle";
pub const HOLDALL: &str = "player's holdall";

/// Declare every standard kind, bases before the kinds derived from them.
pub fn declare_standard_kinds(world: &mut World) -> Result<()> {
    world.declare_kind(
        ROOM,
        None,
        Some(setup(|room| {
            room.can_be_one_of(&["lighted", "dark"], Some(Qualifier::usually("lighted")))?;
            room.can_be_one_of(&["visited", "unvisited"], Some(Qualifier::usually("unvisited")))?;
            let description = format!("It's the {}.", room.name());
            room.has("description", description)?;
            room.has("map region", Value::Nothing)?;
            room.has("map connections", Value::empty_map())?;
            room.has("location", Value::Nothing)
        })),
    )?;

    world.declare_kind(
        THING,
        None,
        Some(setup(|thing| {
            thing.can_be_one_of(&["lit", "unlit"], Some(Qualifier::usually("unlit")))?;
            thing.can_be_one_of(&["edible", "inedible"], Some(Qualifier::usually("inedible")))?;
            thing.can_be_one_of(
                &["fixed in place", "portable"],
                Some(Qualifier::usually("portable")),
            )?;
            thing.can_be("scenery", None)?;
            thing.can_be("wearable", None)?;
            thing.has("description", "")?;
            thing.has("location", Value::Nothing)?;
            thing.can_be(
                "pushable between rooms",
                Some(Qualifier::usually("pushable between rooms")),
            )?;
            thing.can_be("handled", None)?;
            thing.can_be_one_of(
                &["described", "undescribed"],
                Some(Qualifier::usually("described")),
            )?;
            thing.can_be_one_of(
                &["mentioned", "unmentioned"],
                Some(Qualifier::usually("mentioned")),
            )?;
            thing.can_be_one_of(
                &["marked for listing", "unmarked for listing"],
                Some(Qualifier::usually("unmarked for listing")),
            )?;
            thing.has("initial appearance", "")
        })),
    )?;

    world.declare_kind(
        DIRECTION,
        None,
        Some(setup(|direction| direction.has("opposite", Value::Nothing))),
    )?;

    world.declare_kind(
        DOOR,
        Some(THING),
        Some(setup(|door| {
            door.always("fixed in place")?;
            door.never("pushable between rooms")?;
            door.has("other side", Value::Nothing)?;
            door.can_be_one_of(&["open", "closed"], Some(Qualifier::usually("closed")))?;
            door.can_be_one_of(&["openable", "unopenable"], Some(Qualifier::usually("openable")))?;
            lockable(door)
        })),
    )?;

    world.declare_kind(
        CONTAINER,
        Some(THING),
        Some(setup(|container| {
            container.can_be("enterable", None)?;
            container.can_be_one_of(&["opaque", "transparent"], Some(Qualifier::usually("opaque")))?;
            container.has("carrying capacity", 100)?;
            container.can_be_one_of(&["open", "closed"], Some(Qualifier::usually("open")))?;
            container.can_be_one_of(
                &["openable", "unopenable"],
                Some(Qualifier::usually("unopenable")),
            )?;
            lockable(container)?;
            container.imply("locked", Relation::Usually, "lockable")?;
            container.imply("locked", Relation::Never, "edible")
        })),
    )?;

    world.declare_kind(
        SUPPORTER,
        Some(THING),
        Some(setup(|supporter| {
            supporter.can_be("enterable", None)?;
            supporter.usually("fixed in place")?;
            supporter.has("carrying capacity", 100)
        })),
    )?;

    world.declare_kind(
        BACKDROP,
        Some(THING),
        Some(setup(|backdrop| {
            backdrop.usually("scenery")?;
            backdrop.always("fixed in place")?;
            backdrop.never("pushable between rooms")
        })),
    )?;

    world.declare_kind(
        BEING,
        Some(THING),
        Some(setup(|being| {
            being.can_be_one_of(&["male", "female", "neuter"], Some(Qualifier::usually("neuter")))?;
            being.has("carrying capacity", 100)
        })),
    )?;
    world.declare_kind(PERSON, Some(BEING), None)?;
    world.declare_kind(MAN, Some(PERSON), Some(setup(|man| man.always("male"))))?;
    world.declare_kind(WOMAN, Some(PERSON), Some(setup(|woman| woman.always("female"))))?;
    world.declare_kind(ANIMAL, Some(BEING), None)?;

    world.declare_kind(REGION, None, None)?;

    world.declare_kind(
        DEVICE,
        Some(THING),
        Some(setup(|device| {
            device.can_be_one_of(
                &["switched on", "switched off"],
                Some(Qualifier::usually("switched off")),
            )
        })),
    )?;

    world.declare_kind(
        VEHICLE,
        Some(CONTAINER),
        Some(setup(|vehicle| {
            vehicle.always("enterable")?;
            vehicle.usually("fixed in place")
        })),
    )?;

    world.declare_kind(
        HOLDALL,
        Some(CONTAINER),
        Some(setup(|holdall| {
            holdall.always("portable")?;
            holdall.usually("openable")
        })),
    )
}

fn lockable(entity: &mut fiction_core::Entity) -> Result<()> {
    entity.can_be("lockable", None)?;
    entity.can_be_one_of(&["locked", "unlocked"], Some(Qualifier::usually("unlocked")))?;
    entity.has("matching key", Value::Nothing)
}
