//! Error types for the rules engine.
//!
//! Every fallible operation in this crate returns [`StoryError`] through the
//! [`Result`] alias. Errors are raised where they are detected and are never
//! caught inside the engine: a failing declaration aborts, and a failing rule
//! aborts the whole rulebook chain it runs in.

use crate::entity::EntityId;
use crate::properties::PropertyError;

/// Shorthand for results produced by the engine.
pub type Result<T> = std::result::Result<T, StoryError>;

/// Broad classification of every error the engine raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Something with this name was already declared.
    AlreadyExists,
    /// A name or id refers to nothing that was declared.
    UnknownReference,
    /// An illegal combination of otherwise valid parts.
    Logical,
}

/// Errors raised while declaring or simulating a story world.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("kind {0} already exists")]
    KindExists(String),

    #[error("kind {0} does not exist")]
    UnknownKind(String),

    #[error("rulebook {0} already exists")]
    RulebookExists(String),

    #[error("rulebook {0} does not exist")]
    UnknownRulebook(String),

    #[error("rule {rule} already exists in the {tier} rules of {rulebook}")]
    RuleExists {
        rulebook: String,
        tier: &'static str,
        rule: String,
    },

    #[error("action {0} already exists")]
    ActionExists(String),

    #[error("action {0} does not exist")]
    UnknownAction(String),

    #[error("an entity with id {0} already exists")]
    EntityExists(EntityId),

    #[error("no entity has the id {0}")]
    UnknownEntity(EntityId),

    /// A property operation failed on a concrete entity.
    #[error("{entity} (a {kind}): {source}")]
    Property {
        entity: String,
        kind: String,
        #[source]
        source: PropertyError,
    },

    #[error("{0}")]
    Logical(String),
}

impl StoryError {
    /// Build a logical error from any message.
    pub fn logical(message: impl Into<String>) -> Self {
        StoryError::Logical(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoryError::KindExists(_)
            | StoryError::RulebookExists(_)
            | StoryError::RuleExists { .. }
            | StoryError::ActionExists(_)
            | StoryError::EntityExists(_) => ErrorKind::AlreadyExists,
            StoryError::UnknownKind(_)
            | StoryError::UnknownRulebook(_)
            | StoryError::UnknownAction(_)
            | StoryError::UnknownEntity(_) => ErrorKind::UnknownReference,
            StoryError::Property { source, .. } => source.kind(),
            StoryError::Logical(_) => ErrorKind::Logical,
        }
    }
}
