use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::OrganizationService;
use crate::application::{
    context::RequestContext,
    dto::{CreateOrganizationCommand, OrganizationDto, UpdateOrganizationCommand},
    error::{ErrorSink, ServiceResult},
    pipeline::Transition,
};
use crate::domain::entity::AuditStamp;
use crate::domain::organization::{
    Organization, OrganizationId, OrganizationName, OrganizationSlug,
};
use crate::domain::user::UserId;

impl OrganizationService {
    pub async fn create(
        &self,
        ctx: &RequestContext,
        command: CreateOrganizationCommand,
        cancel: &CancellationToken,
    ) -> ServiceResult<OrganizationDto> {
        let mut sink = ErrorSink::new();
        let name = sink.capture(OrganizationName::new(command.name));
        let owner_id = parse_owner(&mut sink, command.owner_id);
        let (Some(name), Some(owner_id)) = (name, owner_id) else {
            return Err(sink);
        };

        let slug = self.resolve_slug(command.slug, &name, None, cancel).await?;
        let org = Organization {
            id: OrganizationId::generate(),
            slug,
            name,
            address: command.address,
            owner_id,
            groups: Vec::new(),
            active: command.active,
            stamp: AuditStamp::new(self.clock.now()),
        };

        let id = self
            .pipeline
            .apply(
                ctx,
                self.repo.as_ref(),
                &self.validator,
                Transition::Insert(org),
                cancel,
            )
            .await?;
        self.read_model(ctx, id, cancel).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        command: UpdateOrganizationCommand,
        cancel: &CancellationToken,
    ) -> ServiceResult<OrganizationDto> {
        let mut org = self.read(command.id, cancel).await?;

        let mut sink = ErrorSink::new();
        let name = sink.capture(OrganizationName::new(command.name));
        let owner_id = parse_owner(&mut sink, command.owner_id);
        let (Some(name), Some(owner_id)) = (name, owner_id) else {
            return Err(sink);
        };

        if command.slug.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            org.slug = self
                .resolve_slug(command.slug, &name, Some(org.id), cancel)
                .await?;
        }
        org.name = name;
        org.address = command.address;
        org.owner_id = owner_id;
        org.active = command.active;

        let id = self
            .pipeline
            .apply(
                ctx,
                self.repo.as_ref(),
                &self.validator,
                Transition::Update(org),
                cancel,
            )
            .await?;
        self.evict(ctx, id).await;
        self.read_model(ctx, id, cancel).await
    }

    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: OrganizationId,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        let org = self.read(id, cancel).await?;
        let result = self
            .pipeline
            .apply(
                ctx,
                self.repo.as_ref(),
                &self.validator,
                Transition::<Organization>::Delete(org.id),
                cancel,
            )
            .await;
        self.evict(ctx, id).await;
        result.map(|_| ())
    }

    /// An explicit slug is used as given; without one a unique slug is
    /// derived from the name.
    async fn resolve_slug(
        &self,
        requested: Option<String>,
        name: &OrganizationName,
        ignore_id: Option<OrganizationId>,
        cancel: &CancellationToken,
    ) -> ServiceResult<OrganizationSlug> {
        match requested.filter(|s| !s.trim().is_empty()) {
            Some(slug) => Ok(OrganizationSlug::new(slug)?),
            None => Ok(self
                .slug_service
                .generate_unique_slug(name, ignore_id, cancel)
                .await?),
        }
    }
}

fn parse_owner(sink: &mut ErrorSink, owner_id: Option<Uuid>) -> Option<Option<UserId>> {
    match owner_id {
        Some(raw) => sink.capture(UserId::new(raw)).map(Some),
        None => Some(None),
    }
}
