//! Reference validation, consumed checks and the nesting-cycle guard
//!
//! All checks run against a `TaxonomyState` snapshot; callers run them
//! inside the same store transaction as the mutation they protect.

use ccf_common::{
    ClassificationGroupId, ClassificationId, ClassifierError, ClassifierResult, RequestScope,
};
use ccf_store::TaxonomyState;
use std::collections::HashSet;

/// Confirm every referenced classification exists and is visible to the scope
///
/// A record another project keeps private behaves as absent, so reference
/// validation does not leak its existence.
pub fn validate_classification_ids(
    state: &TaxonomyState,
    scope: &RequestScope,
    ids: &[ClassificationId],
) -> ClassifierResult<()> {
    for id in ids {
        let visible = state
            .classification(id)
            .is_some_and(|r| scope.can_see(&r.project_id, r.shared));
        if !visible {
            return Err(ClassifierError::InvalidClassificationId(*id));
        }
    }
    Ok(())
}

/// Confirm every referenced group exists and is visible to the scope
pub fn validate_group_ids(
    state: &TaxonomyState,
    scope: &RequestScope,
    ids: &[ClassificationGroupId],
) -> ClassifierResult<()> {
    for id in ids {
        let visible = state
            .group(id)
            .is_some_and(|g| scope.can_see(&g.project_id, g.shared));
        if !visible {
            return Err(ClassifierError::InvalidClassificationGroupId(*id));
        }
    }
    Ok(())
}

/// A group already nested inside another group cannot be nested again
pub fn check_groups_unconsumed(
    state: &TaxonomyState,
    ids: &[ClassificationGroupId],
) -> ClassifierResult<()> {
    for id in ids {
        if state.groups_referencing_group(id).next().is_some() {
            return Err(ClassifierError::ConsumedClassificationGroup(*id));
        }
    }
    Ok(())
}

/// Deletion requires that no group still references the classification
pub fn check_deletable_classification(
    state: &TaxonomyState,
    id: &ClassificationId,
) -> ClassifierResult<()> {
    if state.groups_referencing_classification(id).next().is_some() {
        return Err(ClassifierError::ConsumedClassification(*id));
    }
    Ok(())
}

/// Deletion requires in-degree zero in the nesting graph
pub fn check_deletable_group(
    state: &TaxonomyState,
    id: &ClassificationGroupId,
) -> ClassifierResult<()> {
    if state.groups_referencing_group(id).next().is_some() {
        return Err(ClassifierError::ConsumedClassificationGroup(*id));
    }
    Ok(())
}

/// Reject membership edges that would close a nesting cycle
///
/// An edge `container -> member` closes a cycle when `container` is
/// reachable from `member` through the existing nesting edges (or when the
/// member is the container itself).
pub fn ensure_acyclic(
    state: &TaxonomyState,
    container: &ClassificationGroupId,
    members: &[ClassificationGroupId],
) -> ClassifierResult<()> {
    for member in members {
        if member == container || reaches(state, member, container) {
            return Err(ClassifierError::ClassificationGroupCycle { group_id: *member });
        }
    }
    Ok(())
}

/// Depth-first search through nesting edges from `from` looking for `target`
fn reaches(
    state: &TaxonomyState,
    from: &ClassificationGroupId,
    target: &ClassificationGroupId,
) -> bool {
    let mut stack = vec![*from];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == *target {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(group) = state.group(&current) {
            stack.extend(group.classification_groups.iter().copied());
        }
    }
    false
}
