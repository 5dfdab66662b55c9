pub mod audit;
pub mod context;
pub mod dto;
pub mod error;
pub mod groups;
pub mod organizations;
pub mod pagination;
pub mod pipeline;
pub mod ports;
pub mod services;

pub use error::{ErrorSink, ServiceResult};
