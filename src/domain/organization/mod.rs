pub mod entity;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use entity::{Organization, OrganizationFilter, OrganizationGroup, OrganizationSummary};
pub use repository::OrganizationRepository;
pub use value_objects::{
    Address, OrganizationId, OrganizationName, OrganizationSlug, OrganizationSortField,
};
