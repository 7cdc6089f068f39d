//! The classifier engine
//!
//! One engine instance per process, built at startup from its explicit
//! parts: the schema registry, the taxonomy store and the event sink.

use crate::{headers, validate};
use ccf_common::{
    ClassificationGroupId, ClassificationId, ClassificationType, ClassifierError,
    ClassifierResult, EventSink, GroupOperator, LogSink, RequestScope, ResourceType,
    TaxonomyEvent,
};
use ccf_schema::SchemaRegistry;
use ccf_store::{Classification, ClassificationGroup, Page, TaxonomyStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Engine construction-time configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether create/delete events are pushed to the sink
    pub notifications_enabled: bool,
    /// Operator applied when a group create omits one
    pub default_operator: GroupOperator,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            default_operator: GroupOperator::And,
        }
    }
}

/// Request to create a classification record
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewClassification {
    /// Protocol type of the record
    pub c_type: ClassificationType,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Visible outside the owning project
    #[serde(default)]
    pub shared: bool,
    /// Invert the match semantics
    #[serde(default)]
    pub negated: bool,
    /// Protocol-specific field values
    #[serde(default)]
    pub definition: Map<String, Value>,
}

/// Request to create a classification group
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewClassificationGroup {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Visible outside the owning project
    #[serde(default)]
    pub shared: bool,
    /// Boolean combinator; the configured default when absent
    #[serde(default)]
    pub operator: Option<GroupOperator>,
    /// Classification members
    #[serde(default)]
    pub classifications: Vec<ClassificationId>,
    /// Nested group members
    #[serde(default)]
    pub classification_groups: Vec<ClassificationGroupId>,
}

/// The only fields an update may touch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRequest {
    /// New display name
    pub name: Option<String>,
    /// New display description
    pub description: Option<String>,
}

impl UpdateRequest {
    /// Parse an update payload, rejecting every frozen field
    pub fn from_payload(payload: &Value) -> ClassifierResult<Self> {
        let object = payload
            .as_object()
            .ok_or_else(|| ClassifierError::InvalidUpdateRequest {
                field: "payload".into(),
            })?;
        let mut update = Self::default();
        for (key, value) in object {
            if !matches!(key.as_str(), "name" | "description") {
                return Err(ClassifierError::InvalidUpdateRequest { field: key.clone() });
            }
            if value.is_null() {
                continue;
            }
            let text = value
                .as_str()
                .ok_or_else(|| ClassifierError::InvalidUpdateRequest { field: key.clone() })?;
            if key == "name" {
                update.name = Some(text.to_string());
            } else {
                update.description = Some(text.to_string());
            }
        }
        Ok(update)
    }
}

/// A group resolved for display: members joined back to full records
#[derive(Debug, Clone, Serialize)]
pub struct GroupDetail {
    /// Group id
    pub id: ClassificationGroupId,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Owning project
    pub project_id: String,
    /// Visible outside the owning project
    pub shared: bool,
    /// Boolean combinator across members
    pub operator: GroupOperator,
    /// Classification members, fully resolved
    pub classifications: Vec<Classification>,
    /// Nested group members, fully resolved
    pub classification_groups: Vec<ClassificationGroup>,
    /// Creation time
    pub created_at: chrono::DateTime<Utc>,
    /// Last name/description update
    pub updated_at: chrono::DateTime<Utc>,
}

/// Schema-registry entry served for client-side form generation
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationTypeInfo {
    /// Protocol type name
    pub name: ClassificationType,
    /// Legal definition fields, in registry order
    pub fields: Vec<&'static str>,
}

/// Composition and validation engine over the taxonomy store
pub struct ClassifierEngine {
    schema: SchemaRegistry,
    store: Arc<TaxonomyStore>,
    sink: Arc<dyn EventSink>,
    config: EngineConfig,
}

impl ClassifierEngine {
    /// Engine with an empty store, a log sink and default configuration
    pub fn new() -> Self {
        Self::with_parts(
            SchemaRegistry::new(),
            Arc::new(TaxonomyStore::new()),
            Arc::new(LogSink),
            EngineConfig::default(),
        )
    }

    /// Engine assembled from explicit parts
    pub fn with_parts(
        schema: SchemaRegistry,
        store: Arc<TaxonomyStore>,
        sink: Arc<dyn EventSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            schema,
            store,
            sink,
            config,
        }
    }

    /// The injected schema registry
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// The backing store
    pub fn store(&self) -> &Arc<TaxonomyStore> {
        &self.store
    }

    fn notify(&self, event: TaxonomyEvent) {
        if self.config.notifications_enabled {
            self.sink.publish(&event);
        }
    }

    /// Create a classification record
    pub fn create_classification(
        &self,
        scope: &RequestScope,
        new: NewClassification,
    ) -> ClassifierResult<Classification> {
        let definition = self
            .schema
            .schema(new.c_type)
            .validate_definition(&new.definition)?;
        let now = Utc::now();
        let record = Classification {
            id: Uuid::new_v4(),
            c_type: new.c_type,
            name: new.name,
            description: new.description,
            project_id: scope.project_id.clone(),
            shared: new.shared,
            negated: new.negated,
            definition,
            created_at: now,
            updated_at: now,
        };
        self.store
            .write(|state| state.insert_classification(record.clone()));
        tracing::debug!(id = %record.id, c_type = %record.c_type, "classification created");
        self.notify(TaxonomyEvent::created(ResourceType::Classification, record.id));
        Ok(record)
    }

    /// Fetch one classification visible to the scope
    pub fn get_classification(
        &self,
        scope: &RequestScope,
        id: ClassificationId,
    ) -> ClassifierResult<Classification> {
        self.store.read(|state| {
            state
                .classification(&id)
                .filter(|r| scope.can_see(&r.project_id, r.shared))
                .cloned()
                .ok_or(ClassifierError::InvalidClassificationId(id))
        })
    }

    /// Update a classification's name/description
    pub fn update_classification(
        &self,
        scope: &RequestScope,
        id: ClassificationId,
        payload: &Value,
    ) -> ClassifierResult<Classification> {
        let update = UpdateRequest::from_payload(payload)?;
        let updated = self.store.write(|state| {
            let record = state
                .classification_mut(&id)
                .filter(|r| scope.owns(&r.project_id))
                .ok_or(ClassifierError::InvalidClassificationId(id))?;
            if let Some(name) = update.name {
                record.name = name;
            }
            if let Some(description) = update.description {
                record.description = description;
            }
            record.updated_at = Utc::now();
            Ok::<_, ClassifierError>(record.clone())
        })?;
        tracing::debug!(id = %id, "classification updated");
        Ok(updated)
    }

    /// Delete a classification that no group references
    pub fn delete_classification(
        &self,
        scope: &RequestScope,
        id: ClassificationId,
    ) -> ClassifierResult<()> {
        self.store.write(|state| {
            state
                .classification(&id)
                .filter(|r| scope.owns(&r.project_id))
                .ok_or(ClassifierError::InvalidClassificationId(id))?;
            validate::check_deletable_classification(state, &id)?;
            state.remove_classification(&id);
            Ok::<_, ClassifierError>(())
        })?;
        tracing::debug!(id = %id, "classification deleted");
        self.notify(TaxonomyEvent::deleted(ResourceType::Classification, id));
        Ok(())
    }

    /// List visible classifications, optionally filtered by type
    pub fn list_classifications(
        &self,
        scope: &RequestScope,
        types: Option<&[ClassificationType]>,
    ) -> Vec<Classification> {
        let requested = types.unwrap_or(&ClassificationType::ALL);
        self.store.read(|state| {
            let mut records: Vec<Classification> = state
                .classifications()
                .filter(|r| requested.contains(&r.c_type))
                .filter(|r| scope.can_see(&r.project_id, r.shared))
                .cloned()
                .collect();
            records.sort_by(|a, b| {
                (a.c_type, &a.name, a.id).cmp(&(b.c_type, &b.name, b.id))
            });
            records
        })
    }

    /// Create a group together with its membership edges, atomically
    pub fn create_group(
        &self,
        scope: &RequestScope,
        new: NewClassificationGroup,
    ) -> ClassifierResult<ClassificationGroup> {
        let now = Utc::now();
        let group = ClassificationGroup {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            project_id: scope.project_id.clone(),
            shared: new.shared,
            operator: new.operator.unwrap_or(self.config.default_operator),
            classifications: new.classifications,
            classification_groups: new.classification_groups,
            created_at: now,
            updated_at: now,
        };
        self.store.write(|state| {
            validate::validate_classification_ids(state, scope, &group.classifications)?;
            validate::validate_group_ids(state, scope, &group.classification_groups)?;
            validate::check_groups_unconsumed(state, &group.classification_groups)?;
            validate::ensure_acyclic(state, &group.id, &group.classification_groups)?;
            state.insert_group(group.clone());
            Ok::<_, ClassifierError>(())
        })?;
        tracing::debug!(id = %group.id, members = group.classifications.len(), "classification group created");
        self.notify(TaxonomyEvent::created(
            ResourceType::ClassificationGroup,
            group.id,
        ));
        Ok(group)
    }

    /// Fetch one group with its membership resolved to full records
    pub fn get_group(
        &self,
        scope: &RequestScope,
        id: ClassificationGroupId,
    ) -> ClassifierResult<GroupDetail> {
        self.store.read(|state| {
            let group = state
                .group(&id)
                .filter(|g| scope.can_see(&g.project_id, g.shared))
                .cloned()
                .ok_or(ClassifierError::InvalidClassificationGroupId(id))?;
            // members the requester cannot see are withheld from the join
            let classifications = group
                .classifications
                .iter()
                .filter_map(|cid| state.classification(cid))
                .filter(|r| scope.can_see(&r.project_id, r.shared))
                .cloned()
                .collect();
            let classification_groups = group
                .classification_groups
                .iter()
                .filter_map(|gid| state.group(gid))
                .filter(|g| scope.can_see(&g.project_id, g.shared))
                .cloned()
                .collect();
            Ok(GroupDetail {
                id: group.id,
                name: group.name,
                description: group.description,
                project_id: group.project_id,
                shared: group.shared,
                operator: group.operator,
                classifications,
                classification_groups,
                created_at: group.created_at,
                updated_at: group.updated_at,
            })
        })
    }

    /// List visible groups with stable pagination
    pub fn list_groups(&self, scope: &RequestScope, page: &Page) -> Vec<ClassificationGroup> {
        self.store.read(|state| {
            let groups: Vec<ClassificationGroup> = state
                .groups()
                .filter(|g| scope.can_see(&g.project_id, g.shared))
                .cloned()
                .collect();
            page.apply(groups)
        })
    }

    /// Update a group's name/description
    pub fn update_group(
        &self,
        scope: &RequestScope,
        id: ClassificationGroupId,
        payload: &Value,
    ) -> ClassifierResult<ClassificationGroup> {
        let update = UpdateRequest::from_payload(payload)?;
        let updated = self.store.write(|state| {
            let group = state
                .group_mut(&id)
                .filter(|g| scope.owns(&g.project_id))
                .ok_or(ClassifierError::InvalidClassificationGroupId(id))?;
            if let Some(name) = update.name {
                group.name = name;
            }
            if let Some(description) = update.description {
                group.description = description;
            }
            group.updated_at = Utc::now();
            Ok::<_, ClassifierError>(group.clone())
        })?;
        tracing::debug!(id = %id, "classification group updated");
        Ok(updated)
    }

    /// Delete a group that no other group nests
    pub fn delete_group(
        &self,
        scope: &RequestScope,
        id: ClassificationGroupId,
    ) -> ClassifierResult<()> {
        self.store.write(|state| {
            state
                .group(&id)
                .filter(|g| scope.owns(&g.project_id))
                .ok_or(ClassifierError::InvalidClassificationGroupId(id))?;
            validate::check_deletable_group(state, &id)?;
            state.remove_group(&id);
            Ok::<_, ClassifierError>(())
        })?;
        tracing::debug!(id = %id, "classification group deleted");
        self.notify(TaxonomyEvent::deleted(ResourceType::ClassificationGroup, id));
        Ok(())
    }

    /// The schema registry contents, for client-side form generation
    pub fn classification_types(&self) -> Vec<ClassificationTypeInfo> {
        self.schema
            .schemas()
            .map(|s| ClassificationTypeInfo {
                name: s.c_type(),
                fields: s.field_names().collect(),
            })
            .collect()
    }

    /// Wire presentation of a record: nested definition with null defaults
    pub fn present_classification(&self, record: &Classification) -> ClassifierResult<Value> {
        headers::merge_header(&self.schema, &headers::flatten_record(record))
    }
}

impl Default for ClassifierEngine {
    fn default() -> Self {
        Self::new()
    }
}
