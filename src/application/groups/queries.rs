use tokio_util::sync::CancellationToken;

use super::GroupService;
use crate::application::{
    dto::{GroupBrowseQuery, GroupDto, GroupSummaryDto, PaginatedResult},
    error::{ErrorSink, ServiceResult},
    pagination::paginate,
};
use crate::domain::group::{Group, GroupFilter, GroupId, GroupSortField, GroupSummary};
use crate::domain::query::{PageQuery, SearchTerm, SortKey};

impl GroupService {
    pub async fn browse(
        &self,
        query: GroupBrowseQuery,
        cancel: &CancellationToken,
    ) -> ServiceResult<PaginatedResult<GroupSummaryDto>> {
        let filter = GroupFilter {
            organization_id: query.organization_id,
            search: SearchTerm::parse(query.search.as_deref()),
            active_only: query.active_only,
        };
        let page_query = PageQuery::new(filter)
            .with_sort(query.sort)
            .or_default_sort(SortKey::asc(GroupSortField::Name))
            .with_page(self.limits.request(query.page, query.page_size));

        let page: PaginatedResult<GroupSummary> =
            paginate(self.repo.as_ref(), &page_query, cancel).await?;
        Ok(page.map(GroupSummaryDto::from))
    }

    /// Loads the group with its membership. A missing id is reported as a
    /// not-found error in the returned sink.
    pub async fn read(&self, id: GroupId, cancel: &CancellationToken) -> ServiceResult<Group> {
        match self.repo.find(id, cancel).await? {
            Some(group) => Ok(group),
            None => Err(ErrorSink::not_found(format!("group {id} not found"))),
        }
    }

    pub async fn read_model(
        &self,
        id: GroupId,
        cancel: &CancellationToken,
    ) -> ServiceResult<GroupDto> {
        self.read(id, cancel).await.map(GroupDto::from)
    }
}
