// src/domain/organization/services.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{time::Clock, util::SlugGenerator};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::organization::repository::OrganizationRepository;
use crate::domain::organization::value_objects::{OrganizationId, OrganizationName, OrganizationSlug};

/// Numbered candidates tried after the bare base before giving up.
const MAX_SUFFIX: u32 = 1000;

/// Produces slugs that no other organization uses.
pub struct OrganizationSlugService {
    repo: Arc<dyn OrganizationRepository>,
    generator: Arc<dyn SlugGenerator>,
    clock: Arc<dyn Clock>,
}

/// Base for names that slugify to nothing, such as pure punctuation.
fn fallback_base(at: DateTime<Utc>) -> String {
    format!("organization-{}", at.format("%Y%m%d%H%M%S"))
}

impl OrganizationSlugService {
    pub fn new(
        repo: Arc<dyn OrganizationRepository>,
        generator: Arc<dyn SlugGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            generator,
            clock,
        }
    }

    /// `base`, then `base-1`, `base-2`, ... until one is free. A slug held by
    /// `ignore_id` counts as free so an organization can keep its own.
    pub async fn generate_unique_slug(
        &self,
        name: &OrganizationName,
        ignore_id: Option<OrganizationId>,
        cancel: &CancellationToken,
    ) -> DomainResult<OrganizationSlug> {
        let base = match self.generator.slugify(name.as_str()) {
            slug if slug.is_empty() => fallback_base(self.clock.now()),
            slug => slug,
        };

        let candidates = std::iter::once(base.clone())
            .chain((1..=MAX_SUFFIX).map(|suffix| format!("{base}-{suffix}")));
        for candidate in candidates {
            let slug = OrganizationSlug::new(candidate)?;
            if self.is_available(&slug, ignore_id, cancel).await? {
                return Ok(slug);
            }
        }
        Err(DomainError::Conflict(format!(
            "no free slug derived from '{base}'"
        )))
    }

    async fn is_available(
        &self,
        slug: &OrganizationSlug,
        ignore_id: Option<OrganizationId>,
        cancel: &CancellationToken,
    ) -> DomainResult<bool> {
        Ok(match self.repo.find_by_slug(slug, cancel).await? {
            Some(existing) => ignore_id == Some(existing.id),
            None => true,
        })
    }
}
