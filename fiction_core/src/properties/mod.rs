//! Properties - scalar values, mutually-exclusive option groups and the
//! per-entity table binding property names to them.
//!
//! The table consists of:
//! - **Scalars**: named [`Value`]s replaced wholesale on write
//! - **Groups**: [`PropertyGroup`]s where exactly one option is active
//! - **Implications**: cascades from one option becoming active to another group

mod group;
mod table;
mod value;

pub use group::*;
pub use table::*;
pub use value::*;

use crate::error::ErrorKind;

/// Errors raised by property groups and tables.
///
/// These carry no entity context; [`crate::Entity`] wraps them into
/// [`crate::StoryError::Property`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("property {0} is already declared")]
    AlreadyDeclared(String),

    #[error("unknown property {0}")]
    Unknown(String),

    #[error("property {property} is {found}, not {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{option} conflicts with the pin on {pinned}")]
    PinConflict { option: String, pinned: String },

    #[error("{0}")]
    Logical(String),
}

impl PropertyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PropertyError::AlreadyDeclared(_) => ErrorKind::AlreadyExists,
            PropertyError::Unknown(_) => ErrorKind::UnknownReference,
            PropertyError::TypeMismatch { .. }
            | PropertyError::PinConflict { .. }
            | PropertyError::Logical(_) => ErrorKind::Logical,
        }
    }
}
