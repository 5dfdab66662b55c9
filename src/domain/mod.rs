pub mod audit;
pub mod entity;
pub mod errors;
pub mod group;
pub mod organization;
pub mod query;
pub mod user;
