use std::{sync::Arc, time::Duration};

use super::OrganizationValidator;
use crate::application::{
    pipeline::EntityPipeline,
    ports::{time::Clock, util::SlugGenerator},
};
use crate::domain::organization::{OrganizationRepository, services::OrganizationSlugService};
use crate::domain::query::PageLimits;

pub struct OrganizationService {
    pub(super) repo: Arc<dyn OrganizationRepository>,
    pub(super) pipeline: Arc<EntityPipeline>,
    pub(super) validator: OrganizationValidator,
    pub(super) slug_service: OrganizationSlugService,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) limits: PageLimits,
    pub(super) cache_ttl: Duration,
}

impl OrganizationService {
    pub fn new(
        repo: Arc<dyn OrganizationRepository>,
        pipeline: Arc<EntityPipeline>,
        slugger: Arc<dyn SlugGenerator>,
        clock: Arc<dyn Clock>,
        limits: PageLimits,
        cache_ttl: Duration,
    ) -> Self {
        let slug_service = OrganizationSlugService::new(Arc::clone(&repo), slugger, Arc::clone(&clock));
        Self {
            repo,
            pipeline,
            validator: OrganizationValidator,
            slug_service,
            clock,
            limits,
            cache_ttl,
        }
    }
}
