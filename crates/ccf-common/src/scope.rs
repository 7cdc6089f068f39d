//! Project scoping and the shared-visibility rule

use serde::{Deserialize, Serialize};

/// Identity of the project a request acts on behalf of
///
/// Records are visible to their owning project, or to everyone when marked
/// shared. Mutation always requires ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestScope {
    /// Owning project of the request
    pub project_id: String,
}

impl RequestScope {
    /// Scope acting on behalf of `project_id`
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    /// Whether a record owned by `owner` with the given shared flag is readable
    pub fn can_see(&self, owner: &str, shared: bool) -> bool {
        shared || owner == self.project_id
    }

    /// Whether this scope owns a record held by `owner`
    pub fn owns(&self, owner: &str) -> bool {
        owner == self.project_id
    }
}
