// ── Typed list patches applied after a successful mutation ──

use folio_api::{Identified, Page};

/// How a mutation result is folded into cached lists.
#[derive(Debug, Clone, PartialEq)]
pub enum CachePatch<T> {
    /// Newly created record goes to the front; total grows by one.
    InsertAtHead(T),
    /// Record with the same id is replaced where it sits.
    ReplaceById(T),
    /// Record with this id is dropped; total shrinks by one.
    RemoveById(String),
}

impl<T: Identified + Clone> CachePatch<T> {
    /// Produce a patched copy of `page`.
    pub fn apply(&self, page: &Page<T>) -> Page<T> {
        let mut items = page.items.clone();
        let mut pagination = page.pagination;

        match self {
            Self::InsertAtHead(record) => {
                let before = items.len();
                items.retain(|item| item.id() != record.id());
                let replaced = before - items.len();
                items.insert(0, record.clone());
                if let Some(p) = pagination.as_mut() {
                    if replaced == 0 {
                        p.total += 1;
                    }
                }
            }
            Self::ReplaceById(record) => {
                if let Some(slot) = items.iter_mut().find(|item| item.id() == record.id()) {
                    *slot = record.clone();
                }
            }
            Self::RemoveById(id) => {
                let before = items.len();
                items.retain(|item| item.id() != id);
                let removed = (before - items.len()) as u64;
                if let Some(p) = pagination.as_mut() {
                    p.total = p.total.saturating_sub(removed);
                }
            }
        }

        Page::new(items, pagination)
    }

    /// Id of the record the patch concerns.
    pub fn target_id(&self) -> &str {
        match self {
            Self::InsertAtHead(record) | Self::ReplaceById(record) => record.id(),
            Self::RemoveById(id) => id,
        }
    }
}

/// Outcome of `QueryCache::patch`, mainly for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// List entries rewritten in place.
    pub patched: usize,
    /// List entries whose payload was missing or of another type.
    pub mismatched: usize,
    /// Entries marked stale (detail entries, filtered lists, or the whole
    /// namespace after a mismatch).
    pub invalidated: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use folio_api::Pagination;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        label: String,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, label: &str) -> Row {
        Row {
            id: id.into(),
            label: label.into(),
        }
    }

    fn page(ids: &[&str], total: u64) -> Page<Row> {
        Page::new(
            ids.iter().map(|id| row(id, id)).collect(),
            Some(Pagination {
                page: 1,
                limit: 10,
                total,
                pages: 1,
            }),
        )
    }

    #[test]
    fn insert_puts_record_first_and_counts_it() {
        let before = page(&["a", "b"], 2);
        let after = CachePatch::InsertAtHead(row("c", "new")).apply(&before);
        assert_eq!(after.items[0], row("c", "new"));
        assert_eq!(after.len(), 3);
        assert_eq!(after.total(), 3);
    }

    #[test]
    fn insert_of_known_id_does_not_double_count() {
        let before = page(&["a", "b"], 2);
        let after = CachePatch::InsertAtHead(row("b", "moved")).apply(&before);
        assert_eq!(after.items, vec![row("b", "moved"), row("a", "a")]);
        assert_eq!(after.total(), 2);
    }

    #[test]
    fn replace_keeps_position_and_neighbours() {
        let before = page(&["a", "b", "c"], 3);
        let after = CachePatch::ReplaceById(row("b", "edited")).apply(&before);
        assert_eq!(after.items, vec![row("a", "a"), row("b", "edited"), row("c", "c")]);
        assert_eq!(after.total(), 3);
    }

    #[test]
    fn replace_of_unknown_id_is_a_no_op() {
        let before = page(&["a"], 1);
        assert_eq!(CachePatch::ReplaceById(row("z", "z")).apply(&before), before);
    }

    #[test]
    fn remove_drops_record_and_decrements() {
        let before = page(&["a", "b"], 2);
        let after = CachePatch::<Row>::RemoveById("a".into()).apply(&before);
        assert_eq!(after.items, vec![row("b", "b")]);
        assert_eq!(after.total(), 1);

        let untouched = CachePatch::<Row>::RemoveById("zz".into()).apply(&after);
        assert_eq!(untouched.total(), 1);
    }

    #[test]
    fn unpaginated_lists_count_by_length() {
        let before = Page::new(vec![row("a", "a")], None);
        let after = CachePatch::InsertAtHead(row("b", "b")).apply(&before);
        assert_eq!(after.total(), 2);
        let after = CachePatch::<Row>::RemoveById("a".into()).apply(&after);
        assert_eq!(after.total(), 1);
    }
}
