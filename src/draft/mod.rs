// Dirty-tracked edit buffer for forms

use crate::entity::Entity;
use std::collections::BTreeSet;

/// Draft pairs an immutable base value with a user-editable live copy
///
/// The base is captured once at load time and never exposed mutably;
/// `is_clean` compares the two structurally.
#[derive(Clone, Debug)]
pub struct Draft<T> {
    base: T,
    live: T,
}

impl<T: Clone + PartialEq> Draft<T> {
    pub fn new(base: T) -> Self {
        Self {
            live: base.clone(),
            base,
        }
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    pub fn live(&self) -> &T {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut T {
        &mut self.live
    }

    /// True when the live copy equals the base
    pub fn is_clean(&self) -> bool {
        self.base == self.live
    }

    /// Discard edits, restoring the live copy from the base
    pub fn reset(&mut self) {
        self.live = self.base.clone();
    }
}

impl Draft<Entity> {
    /// Names of fields whose live value differs from the base (added, removed or changed)
    pub fn changed_fields(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self
            .base
            .fields()
            .chain(self.live.fields())
            .map(|(name, _)| name)
            .collect();

        names
            .into_iter()
            .filter(|name| self.base.get(name) != self.live.get(name))
            .cloned()
            .collect()
    }
}
