//! CCF Store - Persistence backend for the classification taxonomy
//!
//! Holds the whole taxonomy (classification records, groups, and the
//! membership edges between them) behind a single lock. Every engine
//! operation runs as one closure-scoped transaction, so a group and its
//! membership edges commit together and a deletability check cannot race a
//! concurrent membership write.

#![warn(missing_docs)]

pub mod page;
pub mod records;
pub mod state;
pub mod store;

pub use page::{Page, SortKey};
pub use records::{Classification, ClassificationGroup};
pub use state::TaxonomyState;
pub use store::TaxonomyStore;
