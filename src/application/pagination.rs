// src/application/pagination.rs
use crate::application::dto::PaginatedResult;
use crate::domain::errors::DomainResult;
use crate::domain::query::{PageQuery, PagedSource};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Runs `query` against `source` and bundles the slice with the total
/// number of matching rows.
///
/// When the first page comes back shorter than the page size the slice is
/// the whole result set, so its length is the total and no count query is
/// issued. Any other case asks the source for a count.
pub async fn paginate<F, S, T, P>(
    source: &P,
    query: &PageQuery<F, S>,
    cancel: &CancellationToken,
) -> DomainResult<PaginatedResult<T>>
where
    F: Send + Sync + 'static,
    S: Send + Sync + 'static,
    T: Send + 'static,
    P: PagedSource<F, S, T> + ?Sized,
{
    let page = query.page;
    let items = source.fetch_slice(query, cancel).await?;
    let fetched = items.len() as u64;

    let total = if page.is_first() && fetched < u64::from(page.page_size()) {
        trace!(fetched, "short first page, skipping count query");
        fetched
    } else {
        source.count_matching(&query.filter, cancel).await?
    };

    Ok(PaginatedResult::new(
        items,
        total,
        page.page(),
        page.page_size(),
    ))
}
