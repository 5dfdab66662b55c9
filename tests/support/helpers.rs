// tests/support/helpers.rs
use super::mocks::{
    DummyClock, DummySlug, InMemoryAuditRepo, InMemoryGroupRepo, InMemoryOrganizationRepo,
    RecordingCache, StaticIdentity,
};
use identity_backoffice::application::context::{Principal, RequestContext, claim_types};
use identity_backoffice::application::error::{ErrorSink, ServiceError};
use identity_backoffice::application::ports::{
    cache::Cache, identity::IdentityResolver, time::Clock, util::SlugGenerator,
};
use identity_backoffice::application::services::ApplicationServices;
use identity_backoffice::domain::audit::{AuditLogRepository, AuditResult};
use identity_backoffice::domain::group::GroupRepository;
use identity_backoffice::domain::organization::OrganizationRepository;
use identity_backoffice::domain::query::PageLimits;
use identity_backoffice::domain::user::UserId;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const ADMIN_ID: Uuid = Uuid::from_u128(0xa11ce);
pub const CLIENT_ADDRESS: &str = "203.0.113.7";

/// Deterministic, non-nil user id.
pub fn user(n: u128) -> Uuid {
    Uuid::from_u128(0x1000 + n)
}

pub fn admin() -> UserId {
    UserId::new(ADMIN_ID).unwrap()
}

pub fn admin_principal() -> Principal {
    Principal::anonymous()
        .with_claim(claim_types::SUBJECT, ADMIN_ID.to_string())
        .with_claim(claim_types::NAME, "alice")
        .with_claim(claim_types::EMAIL, "alice@example.com")
}

pub fn cancel() -> CancellationToken {
    CancellationToken::new()
}

/// Services wired to in-memory doubles, with handles to each double.
pub struct Harness {
    pub services: ApplicationServices,
    pub groups: Arc<InMemoryGroupRepo>,
    pub organizations: Arc<InMemoryOrganizationRepo>,
    pub audit: Arc<InMemoryAuditRepo>,
    pub cache: Arc<RecordingCache>,
    pub identity: Arc<StaticIdentity>,
}

impl Harness {
    pub fn ctx(&self) -> RequestContext {
        self.services.context(admin_principal(), Some(CLIENT_ADDRESS))
    }

    pub fn audit_results(&self) -> Vec<AuditResult> {
        self.audit.entries().iter().map(|log| log.result).collect()
    }
}

pub struct HarnessBuilder {
    groups: InMemoryGroupRepo,
    organizations: InMemoryOrganizationRepo,
    cache: RecordingCache,
    identity: StaticIdentity,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            groups: InMemoryGroupRepo::default(),
            organizations: InMemoryOrganizationRepo::default(),
            cache: RecordingCache::default(),
            identity: StaticIdentity::default(),
        }
    }
}

impl HarnessBuilder {
    pub fn groups(mut self, groups: InMemoryGroupRepo) -> Self {
        self.groups = groups;
        self
    }

    pub fn organizations(mut self, organizations: InMemoryOrganizationRepo) -> Self {
        self.organizations = organizations;
        self
    }

    pub fn cache(mut self, cache: RecordingCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn identity(mut self, identity: StaticIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn build(self) -> Harness {
        let groups = Arc::new(self.groups);
        let organizations = Arc::new(self.organizations);
        let audit = Arc::new(InMemoryAuditRepo::default());
        let cache = Arc::new(self.cache);
        let identity = Arc::new(self.identity);

        let group_repo: Arc<dyn GroupRepository> = groups.clone();
        let organization_repo: Arc<dyn OrganizationRepository> = organizations.clone();
        let audit_repo: Arc<dyn AuditLogRepository> = audit.clone();
        let cache_port: Arc<dyn Cache> = cache.clone();
        let identity_port: Arc<dyn IdentityResolver> = identity.clone();
        let clock: Arc<dyn Clock> = Arc::new(DummyClock);
        let slugger: Arc<dyn SlugGenerator> = Arc::new(DummySlug);

        let services = ApplicationServices::new(
            group_repo,
            organization_repo,
            audit_repo,
            identity_port,
            cache_port,
            clock,
            slugger,
            PageLimits::default(),
            Duration::from_secs(60),
        );

        Harness {
            services,
            groups,
            organizations,
            audit,
            cache,
            identity,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

pub fn validation_fields(sink: &ErrorSink) -> Vec<String> {
    sink.errors()
        .iter()
        .filter_map(|e| match e {
            ServiceError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        })
        .collect()
}

pub fn has_critical(sink: &ErrorSink) -> bool {
    sink.errors()
        .iter()
        .any(|e| matches!(e, ServiceError::Critical(_)))
}
