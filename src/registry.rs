//! Transformation registry: maps archive entry names to chains of text
//! transformations.
//!
//! A chain is folded over the entry's decoded content one function at a
//! time. Each step either continues with new text or signals that the entry
//! should be dropped from the target archive, which short-circuits the rest
//! of the chain.

use std::collections::HashMap;

use crate::error::FixError;

/// Result of one transformation step (or of a whole chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going with this text.
    Continue(String),
    /// Drop the entry from the target archive.
    Delete,
}

/// A single text transformation in a chain.
pub type Transform = Box<dyn Fn(&str) -> Result<Outcome, FixError>>;

/// Entry name → ordered transformation chain.
#[derive(Default)]
pub struct Registry {
    chains: HashMap<String, Vec<Transform>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `name` has a registered chain.
    pub fn contains(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// Returns true if no chains are registered at all.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Registers `transform` for `name`, appending to any existing chain.
    ///
    /// The new transformation receives the output of the chain registered so
    /// far as its input.
    pub fn register(&mut self, name: impl Into<String>, transform: Transform) {
        self.chains.entry(name.into()).or_default().push(transform);
    }

    /// Marks `name` for deletion, replacing any chain registered so far.
    ///
    /// Transforming content that is about to be dropped is wasted work, so
    /// a deletion request discards earlier registrations for the same name.
    pub fn register_delete(&mut self, name: impl Into<String>) {
        self.chains
            .insert(name.into(), vec![Box::new(|_| Ok(Outcome::Delete))]);
    }

    /// Folds the chain registered for `name` over `text`.
    ///
    /// A name without a chain passes its text through unchanged. A `Delete`
    /// from any step skips the remaining steps.
    pub fn apply(&self, name: &str, text: &str) -> Result<Outcome, FixError> {
        let mut current = text.to_string();

        if let Some(chain) = self.chains.get(name) {
            for transform in chain {
                match transform(&current)? {
                    Outcome::Continue(next) => current = next,
                    Outcome::Delete => return Ok(Outcome::Delete),
                }
            }
        }

        Ok(Outcome::Continue(current))
    }
}
