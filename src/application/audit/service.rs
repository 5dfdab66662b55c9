use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::AuditEntry;
use crate::application::ports::time::Clock;
use crate::domain::audit::{AuditLogRepository, NewAuditLog};
use crate::domain::query::PageLimits;

pub struct AuditLogWriter {
    pub(super) repo: Arc<dyn AuditLogRepository>,
    pub(super) limits: PageLimits,
    clock: Arc<dyn Clock>,
}

impl AuditLogWriter {
    pub fn new(repo: Arc<dyn AuditLogRepository>, clock: Arc<dyn Clock>, limits: PageLimits) -> Self {
        Self {
            repo,
            limits,
            clock,
        }
    }

    /// Appends one record and reports whether it was committed. A failed
    /// write is logged and reported as `false`; it is never raised.
    pub async fn log(&self, entry: AuditEntry, cancel: &CancellationToken) -> bool {
        let event = entry.event;
        let record = NewAuditLog {
            event: entry.event,
            result: entry.result,
            client_address: entry.client_address,
            message: entry.message,
            request: entry.request,
            user_id: entry.user_id,
            user_name: entry.user_name,
            user_email: entry.user_email,
            location: entry.location,
            created_at: self.clock.now(),
        };

        match self.repo.append(record, cancel).await {
            Ok(true) => true,
            Ok(false) => {
                warn!(%event, "audit log append was not committed");
                false
            }
            Err(err) => {
                warn!(%event, error = %err, "failed to append audit log");
                false
            }
        }
    }
}
