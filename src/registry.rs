//! The section registry owns identity, hierarchy and ordering for every section.
//!
//! Sections live in a flat, insertion-ordered sequence with an id index beside it.
//! Parents are referenced by id, so the hierarchy is a set of weak links and child lists
//! are derived on demand. After every addition or removal the order and level keys are
//! recomputed in one pass over the sequence: roots are spaced by [`ORDER_SPACING`] and
//! each root's descendants are numbered inside its window in pre-order, children visited
//! in insertion order.

use crate::error::RegistryError;
use crate::section::{Section, ORDER_SPACING};
use std::collections::HashMap;

#[derive(Default, Debug)]
/// Insertion-ordered collection of sections with derived order and level keys.
pub struct SectionRegistry {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl SectionRegistry {
    #[must_use]
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new section and recomputes order and level keys.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is empty, already registered, or if `parent` names a
    /// section that is not registered.
    pub fn add_section(
        &mut self,
        name: &str,
        id: &str,
        parent: Option<&str>,
    ) -> Result<&Section, RegistryError> {
        let index = self.insert(name, id, parent)?;
        Ok(&self.sections[index])
    }

    pub(crate) fn insert(
        &mut self,
        name: &str,
        id: &str,
        parent: Option<&str>,
    ) -> Result<usize, RegistryError> {
        if id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if self.index.contains_key(id) {
            return Err(RegistryError::DuplicateId { id: id.to_string() });
        }
        if let Some(parent) = parent {
            if !self.index.contains_key(parent) {
                return Err(RegistryError::UnknownParent {
                    id: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }

        let index = self.sections.len();
        self.sections
            .push(Section::new(name, id, parent.map(str::to_string)));
        self.index.insert(id.to_string(), index);
        self.recompute();
        Ok(index)
    }

    /// Unregisters a section, handing its children to its own parent.
    ///
    /// If the removed section was active, no other section becomes active.
    pub fn remove_section(&mut self, id: &str) -> Option<Section> {
        let index = self.index.remove(id)?;
        let removed = self.sections.remove(index);

        for section in &mut self.sections {
            if section.parent.as_deref() == Some(id) {
                section.parent.clone_from(&removed.parent);
            }
        }

        self.reindex();
        self.recompute();
        Some(removed)
    }

    #[must_use]
    /// Looks up a section by id.
    pub fn get(&self, id: &str) -> Option<&Section> {
        self.index.get(id).map(|&i| &self.sections[i])
    }

    #[must_use]
    /// True if a section with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    /// All sections in registration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// All sections sorted by their order key, i.e. table-of-contents order.
    pub fn ordered(&self) -> Vec<&Section> {
        let mut ordered: Vec<&Section> = self.sections.iter().collect();
        ordered.sort_by_key(|s| s.order);
        ordered
    }

    /// Direct children of a section in registration order.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections
            .iter()
            .filter(move |s| s.parent.as_deref() == Some(id))
    }

    #[must_use]
    /// Containing sections of `id`, nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<&Section> {
        let mut ancestors = Vec::new();
        let mut current = self.get(id).and_then(|s| s.parent.as_deref());
        while let Some(parent_id) = current {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            ancestors.push(parent);
            current = parent.parent.as_deref();
        }
        ancestors
    }

    #[must_use]
    /// The first section flagged active, if any.
    pub fn active_section(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.is_active)
    }

    #[must_use]
    /// Number of registered sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Clears every active flag, then flags exactly `id`.
    ///
    /// Returns `false` without touching any flag when `id` is unknown.
    pub(crate) fn set_active(&mut self, id: &str) -> bool {
        let Some(&target) = self.index.get(id) else {
            return false;
        };
        for section in &mut self.sections {
            section.is_active = false;
        }
        self.sections[target].is_active = true;
        true
    }

    fn reindex(&mut self) {
        self.index = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
    }

    fn recompute(&mut self) {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.sections.len()];
        let mut roots = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            match section.parent.as_deref().and_then(|p| self.index.get(p)) {
                Some(&parent) => children[parent].push(i),
                None => roots.push(i),
            }
        }

        let mut rank: i64 = 0;
        for root in roots {
            let base = rank.saturating_mul(ORDER_SPACING);
            rank += 1;

            // Pre-order walk; children are pushed reversed so insertion order pops first.
            let mut offset: i64 = 0;
            let mut stack = vec![(root, 0usize)];
            while let Some((i, level)) = stack.pop() {
                self.sections[i].level = level;
                self.sections[i].order = base + offset;
                offset += 1;
                for &child in children[i].iter().rev() {
                    stack.push((child, level + 1));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/registry.rs"]
mod tests;
