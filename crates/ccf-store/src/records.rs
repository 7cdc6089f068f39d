//! Taxonomy records

use ccf_common::{ClassificationGroupId, ClassificationId, ClassificationType, GroupOperator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single typed packet-header match rule
///
/// One struct for every protocol type: `c_type` selects the field schema
/// and `definition` carries exactly the validated fields of that schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Unique id, generated at creation
    pub id: ClassificationId,
    /// Protocol type, write-once
    pub c_type: ClassificationType,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Owning project, immutable after creation
    pub project_id: String,
    /// Visible/usable outside the owning project
    pub shared: bool,
    /// Match semantics inverted
    pub negated: bool,
    /// Validated protocol-specific field values
    pub definition: BTreeMap<String, Value>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last name/description update
    pub updated_at: DateTime<Utc>,
}

/// A named boolean-combined collection of classifications and nested groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationGroup {
    /// Unique id, generated at creation
    pub id: ClassificationGroupId,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Owning project, immutable after creation
    pub project_id: String,
    /// Visible/usable outside the owning project
    pub shared: bool,
    /// Boolean combinator across all members
    pub operator: GroupOperator,
    /// Direct classification members
    pub classifications: Vec<ClassificationId>,
    /// Direct nested-group members
    pub classification_groups: Vec<ClassificationGroupId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last name/description update
    pub updated_at: DateTime<Utc>,
}
