//! Lock-guarded taxonomy store

use crate::state::TaxonomyState;
use parking_lot::RwLock;

/// In-memory persistence backend with a single transaction boundary
///
/// The closure passed to [`read`](Self::read) or [`write`](Self::write) is
/// the transaction: it observes (and for `write`, mutates) one consistent
/// snapshot of the whole taxonomy. Validation-then-mutation sequences that
/// must not race (consumed checks before a delete, membership-edge writes
/// with their group row) run inside one closure.
#[derive(Debug, Default)]
pub struct TaxonomyStore {
    state: RwLock<TaxonomyState>,
}

impl TaxonomyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only transaction
    pub fn read<R>(&self, f: impl FnOnce(&TaxonomyState) -> R) -> R {
        f(&self.state.read())
    }

    /// Run a read-write transaction
    pub fn write<R>(&self, f: impl FnOnce(&mut TaxonomyState) -> R) -> R {
        f(&mut self.state.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_is_visible_to_read() {
        let store = TaxonomyStore::new();
        let count = store.read(|s| s.classifications().count());
        assert_eq!(count, 0);

        store.write(|s| {
            let now = chrono::Utc::now();
            s.insert_classification(crate::Classification {
                id: uuid::Uuid::new_v4(),
                c_type: ccf_common::ClassificationType::Udp,
                name: "dns".into(),
                description: String::new(),
                project_id: "p1".into(),
                shared: false,
                negated: false,
                definition: Default::default(),
                created_at: now,
                updated_at: now,
            });
        });

        assert_eq!(store.read(|s| s.classifications().count()), 1);
    }
}
