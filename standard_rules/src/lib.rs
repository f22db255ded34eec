//! # Standard Rules
//!
//! The content library every story starts from, built on `fiction_core`.
//!
//! ## Core Components
//!
//! - **kinds**: rooms, things, doors, containers, people and the rest
//! - **directions** / **map**: the compass and the connections between rooms
//! - **rulebooks**: what happens when play begins
//! - **actions**: looking and going
//! - **story**: the authoring API and scripted test harness
//! - **config**: TOML settings for playing a story

pub mod actions;
pub mod config;
pub mod directions;
pub mod kinds;
pub mod map;
pub mod rulebooks;
pub mod story;

pub use actions::*;
pub use config::*;
pub use directions::*;
pub use kinds::*;
pub use map::*;
pub use rulebooks::*;
pub use story::*;
