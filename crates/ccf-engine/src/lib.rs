//! CCF Engine - Composition and validation engine
//!
//! Ties the schema registry and the taxonomy store together:
//!
//! - classification create/get/update/delete/list with definition
//!   validation against the registry
//! - group create/get/list/update/delete with reference validation,
//!   consumed checks and the nesting-cycle guard
//! - payload flattening (`break_out_headers`) and reconstruction
//!   (`merge_header`)
//! - derivation of classification records from security-group rules
//! - created/deleted event fan-out to the injected sink

#![warn(missing_docs)]

pub mod derive;
pub mod engine;
pub mod headers;
pub mod validate;

pub use derive::{derive_from_security_group, RuleDirection, RuleEthertype, SecurityGroupRule};
pub use engine::{
    ClassificationTypeInfo, ClassifierEngine, EngineConfig, GroupDetail, NewClassification,
    NewClassificationGroup, UpdateRequest,
};
pub use headers::{break_out_headers, flatten_record, merge_header};
