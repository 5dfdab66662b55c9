use std::sync::Arc;

use super::GroupValidator;
use crate::application::{pipeline::EntityPipeline, ports::time::Clock};
use crate::domain::group::GroupRepository;
use crate::domain::query::PageLimits;

pub struct GroupService {
    pub(super) repo: Arc<dyn GroupRepository>,
    pub(super) pipeline: Arc<EntityPipeline>,
    pub(super) validator: GroupValidator,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) limits: PageLimits,
}

impl GroupService {
    pub fn new(
        repo: Arc<dyn GroupRepository>,
        pipeline: Arc<EntityPipeline>,
        clock: Arc<dyn Clock>,
        limits: PageLimits,
    ) -> Self {
        let validator = GroupValidator::new(Arc::clone(&repo));
        Self {
            repo,
            pipeline,
            validator,
            clock,
            limits,
        }
    }
}
