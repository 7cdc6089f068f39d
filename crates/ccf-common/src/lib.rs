//! CCF Common - Shared types for the classification framework
//!
//! This crate provides the vocabulary shared by every other crate:
//! - Protocol-type and group-operator enums
//! - The error taxonomy
//! - Created/deleted taxonomy events and the sink trait that delivers them
//! - Project scoping and the shared-visibility rule

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod scope;
pub mod types;

pub use error::{ClassifierError, ClassifierResult};
pub use event::{BufferSink, EventKind, EventSink, LogSink, ResourceType, TaxonomyEvent};
pub use scope::RequestScope;
pub use types::{ClassificationId, ClassificationGroupId, ClassificationType, GroupOperator};
