pub mod entity;
pub mod repository;

pub use entity::{AuditEvent, AuditLog, AuditLogFilter, AuditResult, AuditSortField, NewAuditLog};
pub use repository::AuditLogRepository;
