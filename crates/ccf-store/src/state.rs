//! Whole-taxonomy state
//!
//! Both record maps plus the membership edges (adjacency vectors on each
//! group). All queries the validation engine needs run against `&self`; a
//! transaction sees one consistent view.

use crate::records::{Classification, ClassificationGroup};
use ccf_common::{ClassificationGroupId, ClassificationId};
use std::collections::HashMap;

/// The complete taxonomy, guarded by one lock in [`crate::TaxonomyStore`]
#[derive(Debug, Default)]
pub struct TaxonomyState {
    classifications: HashMap<ClassificationId, Classification>,
    groups: HashMap<ClassificationGroupId, ClassificationGroup>,
}

impl TaxonomyState {
    /// Look up one classification
    pub fn classification(&self, id: &ClassificationId) -> Option<&Classification> {
        self.classifications.get(id)
    }

    /// Mutable access to one classification
    pub fn classification_mut(&mut self, id: &ClassificationId) -> Option<&mut Classification> {
        self.classifications.get_mut(id)
    }

    /// Whether a classification with `id` exists
    pub fn contains_classification(&self, id: &ClassificationId) -> bool {
        self.classifications.contains_key(id)
    }

    /// Every classification, unordered
    pub fn classifications(&self) -> impl Iterator<Item = &Classification> {
        self.classifications.values()
    }

    /// Persist a classification record
    pub fn insert_classification(&mut self, record: Classification) {
        self.classifications.insert(record.id, record);
    }

    /// Remove a classification record
    pub fn remove_classification(&mut self, id: &ClassificationId) -> Option<Classification> {
        self.classifications.remove(id)
    }

    /// Look up one group
    pub fn group(&self, id: &ClassificationGroupId) -> Option<&ClassificationGroup> {
        self.groups.get(id)
    }

    /// Mutable access to one group
    pub fn group_mut(&mut self, id: &ClassificationGroupId) -> Option<&mut ClassificationGroup> {
        self.groups.get_mut(id)
    }

    /// Whether a group with `id` exists
    pub fn contains_group(&self, id: &ClassificationGroupId) -> bool {
        self.groups.contains_key(id)
    }

    /// Every group, unordered
    pub fn groups(&self) -> impl Iterator<Item = &ClassificationGroup> {
        self.groups.values()
    }

    /// Persist a group together with its membership edges
    pub fn insert_group(&mut self, group: ClassificationGroup) {
        self.groups.insert(group.id, group);
    }

    /// Remove a group and, with it, its own membership edges
    pub fn remove_group(&mut self, id: &ClassificationGroupId) -> Option<ClassificationGroup> {
        self.groups.remove(id)
    }

    /// Groups whose `classifications` set contains `id`
    pub fn groups_referencing_classification<'a>(
        &'a self,
        id: &'a ClassificationId,
    ) -> impl Iterator<Item = &'a ClassificationGroup> {
        self.groups
            .values()
            .filter(move |g| g.classifications.contains(id))
    }

    /// Groups whose `classification_groups` set contains `id`
    pub fn groups_referencing_group<'a>(
        &'a self,
        id: &'a ClassificationGroupId,
    ) -> impl Iterator<Item = &'a ClassificationGroup> {
        self.groups
            .values()
            .filter(move |g| g.classification_groups.contains(id))
    }
}
