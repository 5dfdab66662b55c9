pub mod audit;
pub mod groups;
pub mod organizations;
pub mod pagination;

pub use audit::{AuditLogDto, AuditLogQuery};
pub use groups::{
    CreateGroupCommand, GroupBrowseQuery, GroupDto, GroupMemberDto, GroupSummaryDto,
    UpdateGroupCommand,
};
pub use organizations::{
    CreateOrganizationCommand, OrganizationBrowseQuery, OrganizationDto, OrganizationGroupDto,
    OrganizationSummaryDto, UpdateOrganizationCommand,
};
pub use pagination::PaginatedResult;
