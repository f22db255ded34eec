//! Property groups - mutually exclusive sets of named options.
//!
//! A group with a single declared option is a boolean flag: the negation
//! `"not <option>"` is added automatically. Exactly one option of a group is
//! active at any time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::PropertyError;

/// How strongly an option is asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Active by default, free to change.
    Usually,
    /// Permanently active.
    Always,
    /// Permanently inactive.
    Never,
}

/// A relation applied to one named option, used when declaring a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub relation: Relation,
    pub option: String,
}

impl Qualifier {
    pub fn usually(option: impl Into<String>) -> Self {
        Self {
            relation: Relation::Usually,
            option: option.into(),
        }
    }

    pub fn always(option: impl Into<String>) -> Self {
        Self {
            relation: Relation::Always,
            option: option.into(),
        }
    }

    pub fn never(option: impl Into<String>) -> Self {
        Self {
            relation: Relation::Never,
            option: option.into(),
        }
    }
}

/// The automatically derived negation of a single-option flag.
pub fn negation(option: &str) -> String {
    format!("not {}", option)
}

/// A mutually exclusive set of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyGroup {
    options: Vec<String>,
    active: usize,
    always: Option<usize>,
    never: Vec<usize>,
}

impl PropertyGroup {
    /// Create a group from its options and an optional default qualifier.
    ///
    /// Without a qualifier a flag starts on its negation and a larger group
    /// starts on its first option.
    pub fn new<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        qualifier: Option<Qualifier>,
    ) -> Result<Self, PropertyError> {
        let mut options: Vec<String> = options.into_iter().map(Into::into).collect();

        let is_flag = match options.len() {
            0 => {
                return Err(PropertyError::Logical(
                    "a property group needs at least one option".to_string(),
                ))
            }
            1 => {
                let negated = negation(&options[0]);
                options.push(negated);
                true
            }
            _ => false,
        };

        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(PropertyError::Logical(format!(
                    "option {} appears twice in the group [{}]",
                    option,
                    options.join(", ")
                )));
            }
        }

        let mut group = Self {
            options,
            active: if is_flag { 1 } else { 0 },
            always: None,
            never: Vec::new(),
        };

        if let Some(qualifier) = qualifier {
            if !group.contains(&qualifier.option) {
                return Err(PropertyError::Logical(format!(
                    "a group of [{}] cannot be {:?} {}",
                    group.options.join(", "),
                    qualifier.relation,
                    qualifier.option
                )));
            }
            match qualifier.relation {
                Relation::Usually => group.usually(&qualifier.option)?,
                Relation::Always => group.pin_always(&qualifier.option)?,
                Relation::Never => group.pin_never(&qualifier.option)?,
            };
        }

        Ok(group)
    }

    /// All options in declaration order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The currently active option.
    pub fn active(&self) -> &str {
        &self.options[self.active]
    }

    /// Whether `option` is active, or `None` if it is not in this group.
    pub fn is_active(&self, option: &str) -> Option<bool> {
        self.position(option).map(|i| i == self.active)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.position(option).is_some()
    }

    /// The option pinned as always active, if any.
    pub fn always_pin(&self) -> Option<&str> {
        self.always.map(|i| self.options[i].as_str())
    }

    /// Options pinned as never active.
    pub fn never_pins(&self) -> impl Iterator<Item = &str> {
        self.never.iter().map(|i| self.options[*i].as_str())
    }

    /// Switch `option` on or off, returning the option that is active afterwards.
    ///
    /// Switching an option on deactivates all of its siblings. Switching the
    /// active option off activates the first other option that is not pinned
    /// never.
    pub fn set(&mut self, option: &str, on: bool) -> Result<String, PropertyError> {
        let index = self.require(option)?;

        if on {
            self.check_allowed(index)?;
            self.active = index;
        } else {
            if self.always == Some(index) {
                return Err(PropertyError::PinConflict {
                    option: negation(option),
                    pinned: option.to_string(),
                });
            }
            if self.active == index {
                self.active = self.fallback(index)?;
            }
        }

        Ok(self.active().to_string())
    }

    /// Make `option` the default. Same as switching it on.
    pub fn usually(&mut self, option: &str) -> Result<String, PropertyError> {
        self.set(option, true)
    }

    /// Permanently fix the group on `option`.
    pub fn pin_always(&mut self, option: &str) -> Result<String, PropertyError> {
        let index = self.require(option)?;

        if let Some(pinned) = self.always {
            if pinned != index {
                return Err(PropertyError::PinConflict {
                    option: option.to_string(),
                    pinned: self.options[pinned].clone(),
                });
            }
        }
        if self.never.contains(&index) {
            return Err(PropertyError::PinConflict {
                option: option.to_string(),
                pinned: negation(option),
            });
        }

        self.always = Some(index);
        self.active = index;
        Ok(self.active().to_string())
    }

    /// Permanently exclude `option` from the group.
    pub fn pin_never(&mut self, option: &str) -> Result<String, PropertyError> {
        let index = self.require(option)?;

        if self.always == Some(index) {
            return Err(PropertyError::PinConflict {
                option: negation(option),
                pinned: option.to_string(),
            });
        }

        if !self.never.contains(&index) {
            if self.never.len() + 1 >= self.options.len() {
                return Err(PropertyError::Logical(format!(
                    "pinning {} never would leave no option in [{}]",
                    option,
                    self.options.join(", ")
                )));
            }
            self.never.push(index);
        }

        if self.active == index {
            self.active = self.fallback(index)?;
        }
        Ok(self.active().to_string())
    }

    fn position(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }

    fn require(&self, option: &str) -> Result<usize, PropertyError> {
        self.position(option)
            .ok_or_else(|| PropertyError::Unknown(option.to_string()))
    }

    fn check_allowed(&self, index: usize) -> Result<(), PropertyError> {
        let option = &self.options[index];
        if self.never.contains(&index) {
            return Err(PropertyError::PinConflict {
                option: option.clone(),
                pinned: negation(option),
            });
        }
        match self.always {
            Some(pinned) if pinned != index => Err(PropertyError::PinConflict {
                option: option.clone(),
                pinned: self.options[pinned].clone(),
            }),
            _ => Ok(()),
        }
    }

    /// First option other than `excluded` that may become active.
    fn fallback(&self, excluded: usize) -> Result<usize, PropertyError> {
        let fallback = (0..self.options.len())
            .find(|i| *i != excluded && !self.never.contains(i))
            .ok_or_else(|| {
                PropertyError::Logical(format!(
                    "no option of [{}] can replace {}",
                    self.options.join(", "),
                    self.options[excluded]
                ))
            })?;

        if self.options.len() > 2 {
            warn!(
                replaced = %self.options[excluded],
                fallback = %self.options[fallback],
                "switching off an option of a multi-choice group, falling back to declaration order"
            );
        }
        Ok(fallback)
    }
}
