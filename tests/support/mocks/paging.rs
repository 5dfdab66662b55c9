// tests/support/mocks/paging.rs
use identity_backoffice::domain::query::{PageRequest, SortKey, Sortable, sort_by_keys};

/// Sorts `rows` (already in tie-break order) by `keys` and cuts one page.
pub fn slice_page<T, S>(mut rows: Vec<T>, keys: &[SortKey<S>], page: &PageRequest) -> Vec<T>
where
    T: Sortable<S>,
    S: Copy,
{
    sort_by_keys(&mut rows, keys);
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size() as usize)
        .collect()
}
