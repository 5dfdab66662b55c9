mod cache;
mod commands;
mod queries;
mod service;
mod validation;

pub(crate) use cache::evict_organization;
pub use service::OrganizationService;
pub use validation::OrganizationValidator;
