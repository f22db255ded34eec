//! Plays the "Slightly Wrong" demo story through a scripted walkthrough.

use std::path::PathBuf;

use clap::Parser;
use fiction_core::{EntityId, Placement, Rule};
use standard_rules::{Step, Story, StoryConfig, THING};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play the demo story
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the transcript as a JSON array instead of echoing it
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => StoryConfig::load(path)?,
        None => StoryConfig::default(),
    };
    if args.json {
        config.echo = false;
    } else if args.config.is_none() {
        config.echo = true;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_target(true)
        .init();

    info!(config = ?args.config, "play-story starting");

    let mut story = Story::with_config(&config)?;
    if config.title.is_none() {
        story.title("Slightly Wrong");
    }

    let awning = story.room(
        "Awning",
        Some(
            "A tan awning is stretched on tent poles over the dig-site, providing a little shade \
             to the workers here; you are at the bottom of a square twenty feet on a side, marked \
             out with pegs and lines of string. Uncovered in the south face of this square is an \
             awkward opening into the earth.",
        ),
    )?;
    let chamber = story.room(
        "Slightly Wrong Chamber",
        Some(
            "A mural on the far wall depicts a woman with a staff, tipped with a pine-cone. She \
             appears to be watching you.",
        ),
    )?;
    story.connect(&chamber, &[("south", &awning)])?;

    let trowel = story.thing("trowel", Some("Caked with dry earth."))?;
    let notebook = story.thing("field notebook", None)?;
    story.set(&trowel, "location", &awning)?;
    story.set(&notebook, "location", &awning)?;

    story.when_play_begins(
        Rule::new("flag missing descriptions rule", |world, _| {
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
        }),
        Placement::Head,
    )?;

    story.go()?;
    story.test_with_actions(&[
        Step::from("looking"),
        Step::new("going", vec![EntityId::new("south")]),
        Step::new("going", vec![EntityId::new("east")]),
        Step::new("going", vec![EntityId::new("north")]),
    ])?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(story.world().transcript().lines())?
        );
    }
    Ok(())
}
