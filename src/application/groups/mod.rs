mod commands;
mod queries;
mod service;
mod validation;

pub use service::GroupService;
pub use validation::GroupValidator;
