//! CCF Schema - Field Schema Registry
//!
//! Enumerates, per protocol type, the legal packet-header fields a
//! classification definition may constrain, together with the validator for
//! each field. The registry is an explicit immutable value built once at
//! startup and injected into the engine; there is no global mutable state.

#![warn(missing_docs)]

pub mod registry;
pub mod validators;

pub use registry::{FieldDef, FieldValidator, SchemaRegistry, TypeSchema};
pub use validators::{ETHERTYPE_IPV4, ETHERTYPE_IPV6};
