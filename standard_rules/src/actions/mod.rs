//! The standard actions.

mod going;
mod looking;

pub use going::*;
pub use looking::*;

use fiction_core::{Result, World};

/// Declare every standard action with its rules.
pub fn declare_standard_actions(world: &mut World) -> Result<()> {
    declare_looking(world)?;
    declare_going(world)
}
