use tracing::warn;

use crate::application::{context::RequestContext, dto::OrganizationDto, ports::cache::Cache};
use crate::domain::organization::OrganizationId;

use super::OrganizationService;

fn cache_key(id: OrganizationId) -> String {
    format!("organization:{id}")
}

/// Drops the cached read model of organization `id`. The model lists the
/// organization's groups, so group mutations call this too.
pub(crate) async fn evict_organization(cache: &dyn Cache, id: OrganizationId) {
    if let Err(err) = cache.remove(&cache_key(id)).await {
        warn!(%id, error = %err, "organization cache eviction failed");
    }
}

// Cache problems are logged and otherwise ignored; the store stays the
// source of truth.
impl OrganizationService {
    pub(super) async fn cached_model(
        &self,
        ctx: &RequestContext,
        id: OrganizationId,
    ) -> Option<OrganizationDto> {
        let raw = match ctx.cache().get(&cache_key(id)).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(%id, error = %err, "organization cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(model) => Some(model),
            Err(err) => {
                warn!(%id, error = %err, "discarding undecodable cached organization");
                None
            }
        }
    }

    pub(super) async fn store_model(&self, ctx: &RequestContext, model: &OrganizationDto) {
        let id = OrganizationId::new(model.id);
        let raw = match serde_json::to_string(model) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%id, error = %err, "failed to encode organization for cache");
                return;
            }
        };
        if let Err(err) = ctx.cache().set(&cache_key(id), raw, self.cache_ttl).await {
            warn!(%id, error = %err, "organization cache write failed");
        }
    }

    pub(super) async fn evict(&self, ctx: &RequestContext, id: OrganizationId) {
        evict_organization(ctx.cache(), id).await;
    }
}
