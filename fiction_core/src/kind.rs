//! Kinds - data-driven descriptors for classes of entities.
//!
//! A kind names an optional base kind and an optional setup procedure.
//! Instantiating a kind creates a bare [`Entity`] and applies the setup of
//! every kind in its lineage, root first, so a derived kind layers its own
//! declarations on top of everything its base declares.

use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::entity::{Entity, IdPolicy};
use crate::error::{Result, StoryError};

/// Setup procedure run on every new entity of a kind.
pub type Setup = Rc<dyn Fn(&mut Entity) -> Result<()>>;

/// Wrap a closure as a [`Setup`].
pub fn setup(f: impl Fn(&mut Entity) -> Result<()> + 'static) -> Setup {
    Rc::new(f)
}

/// One registered kind.
#[derive(Clone)]
pub struct KindDescriptor {
    name: String,
    base: Option<String>,
    setup: Option<Setup>,
}

impl KindDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }
}

impl std::fmt::Debug for KindDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindDescriptor")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("has_setup", &self.setup.is_some())
            .finish()
    }
}

/// All kinds declared in a world.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, KindDescriptor>,
    order: Vec<String>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind.
    ///
    /// The setup chain is checked by instantiating a probe entity; if that
    /// fails the kind is not registered and the error is returned.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        base: Option<&str>,
        setup: Option<Setup>,
    ) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(StoryError::KindExists(name));
        }
        if let Some(base) = base {
            if !self.contains(base) {
                return Err(StoryError::UnknownKind(base.to_string()));
            }
        }

        self.kinds.insert(
            name.clone(),
            KindDescriptor {
                name: name.clone(),
                base: base.map(str::to_string),
                setup,
            },
        );
        self.order.push(name.clone());

        if let Err(error) = self.instantiate(&name, "probe", IdPolicy::Literal) {
            self.kinds.remove(&name);
            self.order.pop();
            return Err(error);
        }

        debug!(kind = %name, base = ?base, "declared kind");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&KindDescriptor> {
        self.kinds.get(name)
    }

    /// Kind names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// The kind and all of its bases, root first.
    pub fn lineage(&self, kind: &str) -> Result<Vec<&KindDescriptor>> {
        let mut lineage = Vec::new();
        let mut current = Some(kind);

        while let Some(name) = current {
            let descriptor = self
                .kinds
                .get(name)
                .ok_or_else(|| StoryError::UnknownKind(name.to_string()))?;
            lineage.push(descriptor);
            current = descriptor.base();
        }

        lineage.reverse();
        Ok(lineage)
    }

    /// Whether `kind` is `ancestor` or derives from it.
    pub fn is_a(&self, kind: &str, ancestor: &str) -> bool {
        self.lineage(kind)
            .map(|lineage| lineage.iter().any(|d| d.name == ancestor))
            .unwrap_or(false)
    }

    /// Build an entity of `kind`. The entity is not added to any world.
    pub fn instantiate(&self, kind: &str, name: &str, policy: IdPolicy) -> Result<Entity> {
        let lineage = self.lineage(kind)?;
        let mut entity = Entity::new(name, kind, policy)?;

        for descriptor in lineage {
            if let Some(setup) = &descriptor.setup {
                setup(&mut entity)?;
            }
        }
        Ok(entity)
    }
}
