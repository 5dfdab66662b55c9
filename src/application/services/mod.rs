// src/application/services/mod.rs
use std::{sync::Arc, time::Duration};

use crate::{
    application::{
        audit::AuditLogWriter,
        context::{Principal, RequestContext},
        groups::GroupService,
        organizations::OrganizationService,
        pipeline::EntityPipeline,
        ports::{cache::Cache, identity::IdentityResolver, time::Clock, util::SlugGenerator},
    },
    domain::{
        audit::AuditLogRepository, group::GroupRepository, organization::OrganizationRepository,
        query::PageLimits,
    },
};

pub struct ApplicationServices {
    pub groups: Arc<GroupService>,
    pub organizations: Arc<OrganizationService>,
    audit: Arc<AuditLogWriter>,
    identity: Arc<dyn IdentityResolver>,
    cache: Arc<dyn Cache>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        group_repo: Arc<dyn GroupRepository>,
        organization_repo: Arc<dyn OrganizationRepository>,
        audit_log_repo: Arc<dyn AuditLogRepository>,
        identity: Arc<dyn IdentityResolver>,
        cache: Arc<dyn Cache>,
        clock: Arc<dyn Clock>,
        slugger: Arc<dyn SlugGenerator>,
        limits: PageLimits,
        cache_ttl: Duration,
    ) -> Self {
        let pipeline = Arc::new(EntityPipeline::new(Arc::clone(&clock)));

        let audit = Arc::new(AuditLogWriter::new(
            audit_log_repo,
            Arc::clone(&clock),
            limits,
        ));

        let groups = Arc::new(GroupService::new(
            group_repo,
            Arc::clone(&pipeline),
            Arc::clone(&clock),
            limits,
        ));

        let organizations = Arc::new(OrganizationService::new(
            organization_repo,
            Arc::clone(&pipeline),
            slugger,
            Arc::clone(&clock),
            limits,
            cache_ttl,
        ));

        Self {
            groups,
            organizations,
            audit,
            identity,
            cache,
        }
    }

    pub fn audit(&self) -> Arc<AuditLogWriter> {
        Arc::clone(&self.audit)
    }

    /// Fresh context for one inbound operation.
    pub fn context(&self, principal: Principal, client_address: Option<&str>) -> RequestContext {
        let ctx = RequestContext::new(
            principal,
            Arc::clone(&self.identity),
            Arc::clone(&self.cache),
            Arc::clone(&self.audit),
        );
        match client_address {
            Some(address) => ctx.with_client_address(address),
            None => ctx,
        }
    }
}
