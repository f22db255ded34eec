//! # Fiction Core
//!
//! The rules engine behind an interactive-fiction world. This crate knows
//! nothing about rooms, doors or directions; it provides the machinery the
//! standard library and story authors build those from.
//!
//! ## Core Components
//!
//! - **properties**: mutually-exclusive option groups with pins and cascading implications
//! - **kind** / **entity**: data-driven kind descriptors and the entities built from them
//! - **rulebook**: ordered, three-tier rulebooks that stop at the first rule to decide
//! - **action** / **dispatch**: actions and the stage chain every attempt runs through
//! - **world**: the explicit context every declaration and rule works against
//!
//! ## Design Philosophy
//!
//! - **Declarative**: behaviour is added as named rules, never by editing the engine
//! - **Fail loudly**: declaration and rule errors abort immediately and are never swallowed
//! - **Single writer**: one `&mut World` flows through every rule; there is no locking

pub mod action;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod kind;
pub mod properties;
pub mod rulebook;
pub mod world;

pub use action::*;
pub use entity::*;
pub use error::*;
pub use kind::*;
pub use properties::*;
pub use rulebook::*;
pub use world::*;
