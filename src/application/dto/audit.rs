use crate::domain::audit::{AuditEvent, AuditLog, AuditResult, AuditSortField};
use crate::domain::query::SortKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogDto {
    pub id: i64,
    pub event: AuditEvent,
    pub result: AuditResult,
    pub client_address: String,
    pub message: Option<String>,
    pub request: Option<String>,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogDto {
    fn from(a: AuditLog) -> Self {
        Self {
            id: a.id,
            event: a.event,
            result: a.result,
            client_address: a.client_address,
            message: a.message,
            request: a.request,
            user_id: a.user_id.map(Into::into),
            user_name: a.user_name,
            user_email: a.user_email,
            location: a.location,
            created_at: a.created_at,
        }
    }
}

/// Audit search input. Empty `events` / `results` mean "any"; empty `sort`
/// means newest first.
#[derive(Debug, Clone, Default)]
pub struct AuditLogQuery {
    pub search: Option<String>,
    pub events: Vec<AuditEvent>,
    pub results: Vec<AuditResult>,
    pub sort: Vec<SortKey<AuditSortField>>,
    pub page: u32,
    pub page_size: u32,
}
