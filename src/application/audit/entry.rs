use crate::domain::audit::{AuditEvent, AuditResult};
use crate::domain::user::UserId;

/// Caller-side description of one audit record; the writer adds the
/// timestamp.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub event: AuditEvent,
    pub result: AuditResult,
    pub client_address: String,
    pub message: Option<String>,
    pub request: Option<String>,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub location: Option<String>,
}

impl AuditEntry {
    pub fn new(event: AuditEvent, result: AuditResult, client_address: impl Into<String>) -> Self {
        Self {
            event,
            result,
            client_address: client_address.into(),
            message: None,
            request: None,
            user_id: None,
            user_name: None,
            user_email: None,
            location: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.request = Some(request.into());
        self
    }

    pub fn with_user(
        mut self,
        user_id: Option<UserId>,
        user_name: Option<String>,
        user_email: Option<String>,
    ) -> Self {
        self.user_id = user_id;
        self.user_name = user_name;
        self.user_email = user_email;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
