//! Stable pagination for group listings

use crate::records::ClassificationGroup;
use ccf_common::ClassificationGroupId;
use serde::{Deserialize, Serialize};

/// Sort key for group listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Sort by display name
    #[default]
    Name,
    /// Sort by creation time
    CreatedAt,
}

/// Pagination window: sort key plus marker plus limit
///
/// The marker is the id of the last item of the previous page; ties on the
/// sort key break on id so the order is total and pages are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Sort key applied before windowing
    pub sort: SortKey,
    /// Maximum number of items returned, unbounded when absent
    pub limit: Option<usize>,
    /// Id of the last item of the previous page
    pub marker: Option<ClassificationGroupId>,
}

impl Page {
    /// Sort, seek past the marker, and cut the window
    pub fn apply(&self, mut groups: Vec<ClassificationGroup>) -> Vec<ClassificationGroup> {
        match self.sort {
            SortKey::Name => groups.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id))),
            SortKey::CreatedAt => {
                groups.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            }
        }
        let start = match self.marker {
            Some(marker) => groups
                .iter()
                .position(|g| g.id == marker)
                .map(|i| i + 1)
                .unwrap_or(0),
            None => 0,
        };
        let mut window: Vec<_> = groups.into_iter().skip(start).collect();
        if let Some(limit) = self.limit {
            window.truncate(limit);
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccf_common::GroupOperator;
    use chrono::Utc;
    use uuid::Uuid;

    fn group(name: &str) -> ClassificationGroup {
        let now = Utc::now();
        ClassificationGroup {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            project_id: "p1".into(),
            shared: false,
            operator: GroupOperator::And,
            classifications: vec![],
            classification_groups: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sorted_window_with_marker() {
        let groups = vec![group("charlie"), group("alpha"), group("bravo")];

        let page = Page {
            limit: Some(2),
            ..Page::default()
        };
        let first = page.apply(groups.clone());
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "alpha");
        assert_eq!(first[1].name, "bravo");

        let page = Page {
            limit: Some(2),
            marker: Some(first[1].id),
            ..Page::default()
        };
        let second = page.apply(groups);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "charlie");
    }

    #[test]
    fn test_unknown_marker_starts_over() {
        let groups = vec![group("alpha"), group("bravo")];
        let page = Page {
            marker: Some(Uuid::new_v4()),
            ..Page::default()
        };
        assert_eq!(page.apply(groups).len(), 2);
    }
}
