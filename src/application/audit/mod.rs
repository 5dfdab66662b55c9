mod entry;
mod query;
mod service;

pub use entry::AuditEntry;
pub use service::AuditLogWriter;
