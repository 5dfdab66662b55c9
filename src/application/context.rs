// src/application/context.rs
use crate::application::{
    audit::{AuditEntry, AuditLogWriter},
    error::{ErrorSink, ServiceResult},
    ports::{cache::Cache, identity::IdentityResolver},
};
use crate::domain::audit::{AuditEvent, AuditResult};
use crate::domain::user::UserId;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

pub mod claim_types {
    pub const SUBJECT: &str = "sub";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Claims describing the caller, as produced by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    claims: Vec<Claim>,
}

impl Principal {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_claim(mut self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(kind, value));
        self
    }

    /// First non-blank value of the given claim type.
    pub fn find_first(&self, kind: &str) -> Option<&str> {
        self.claims
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.value.trim())
            .find(|v| !v.is_empty())
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }
}

/// Per-call bundle of caller identity, client address, cache and audit
/// writer.
///
/// The current user id and name are resolved lazily on first use and then
/// kept for the lifetime of this instance; later calls never consult the
/// claims or the identity resolver again.
pub struct RequestContext {
    principal: Principal,
    client_address: String,
    identity: Arc<dyn IdentityResolver>,
    cache: Arc<dyn Cache>,
    audit: Arc<AuditLogWriter>,
    user_id: OnceCell<Option<UserId>>,
    user_name: OnceCell<Option<String>>,
}

impl RequestContext {
    pub fn new(
        principal: Principal,
        identity: Arc<dyn IdentityResolver>,
        cache: Arc<dyn Cache>,
        audit: Arc<AuditLogWriter>,
    ) -> Self {
        Self {
            principal,
            client_address: String::new(),
            identity,
            cache,
            audit,
            user_id: OnceCell::new(),
            user_name: OnceCell::new(),
        }
    }

    pub fn with_client_address(mut self, address: impl Into<String>) -> Self {
        self.client_address = address.into().trim().to_string();
        self
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Empty when the transport could not determine the remote address.
    pub fn client_address(&self) -> &str {
        &self.client_address
    }

    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    pub fn audit(&self) -> &AuditLogWriter {
        self.audit.as_ref()
    }

    pub async fn current_user_id_opt(&self) -> Option<UserId> {
        *self
            .user_id
            .get_or_init(|| async {
                let raw = match self.principal.find_first(claim_types::SUBJECT) {
                    Some(subject) => Some(subject.to_string()),
                    None => self.identity.subject_id(&self.principal).await,
                };
                raw.and_then(|value| match value.parse::<UserId>() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        debug!(subject = %value, error = %err, "subject is not a valid user id");
                        None
                    }
                })
            })
            .await
    }

    pub async fn current_user_id(&self) -> ServiceResult<UserId> {
        self.current_user_id_opt()
            .await
            .ok_or_else(|| {
                let mut sink = ErrorSink::new();
                sink.critical("current user could not be resolved");
                sink
            })
    }

    pub async fn current_user_name(&self) -> Option<String> {
        self.user_name
            .get_or_init(|| async {
                match self.principal.find_first(claim_types::NAME) {
                    Some(name) => Some(name.to_string()),
                    None => self.identity.user_name(&self.principal).await,
                }
            })
            .await
            .clone()
    }

    pub fn current_user_email(&self) -> Option<String> {
        self.principal
            .find_first(claim_types::EMAIL)
            .map(ToString::to_string)
    }

    /// Audit entry pre-filled with the caller's address and identity.
    pub async fn audit_entry(&self, event: AuditEvent, result: AuditResult) -> AuditEntry {
        AuditEntry::new(event, result, self.client_address()).with_user(
            self.current_user_id_opt().await,
            self.current_user_name().await,
            self.current_user_email(),
        )
    }
}
