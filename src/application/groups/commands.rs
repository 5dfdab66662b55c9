use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::GroupService;
use crate::application::{
    context::RequestContext,
    dto::{CreateGroupCommand, GroupDto, UpdateGroupCommand},
    error::{ErrorSink, ServiceResult},
    organizations::evict_organization,
    pipeline::Transition,
};
use crate::domain::entity::AuditStamp;
use crate::domain::group::{Group, GroupId, GroupName};
use crate::domain::user::UserId;

impl GroupService {
    pub async fn create(
        &self,
        ctx: &RequestContext,
        command: CreateGroupCommand,
        cancel: &CancellationToken,
    ) -> ServiceResult<GroupDto> {
        let mut sink = ErrorSink::new();
        let name = sink.capture(GroupName::new(command.name));
        let owner_id = parse_owner(&mut sink, command.owner_id);
        let members = parse_members(&mut sink, command.members);
        let (Some(name), Some(owner_id), Some(members)) = (name, owner_id, members) else {
            return Err(sink);
        };

        let now = self.clock.now();
        let mut group = Group {
            id: GroupId::generate(),
            organization_id: command.organization_id,
            parent_id: command.parent_id,
            name,
            description: normalize_description(command.description),
            owner_id,
            members: Vec::new(),
            members_replaced: false,
            active: command.active,
            stamp: AuditStamp::new(now),
        };
        group.replace_members(members, now);

        let id = self
            .pipeline
            .apply(
                ctx,
                self.repo.as_ref(),
                &self.validator,
                Transition::Insert(group),
                cancel,
            )
            .await?;
        evict_organization(ctx.cache(), command.organization_id).await;
        self.read_model(id, cancel).await
    }

    /// Overwrites the editable fields. When `members` is supplied the whole
    /// membership set is replaced; there is no partial membership update.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        command: UpdateGroupCommand,
        cancel: &CancellationToken,
    ) -> ServiceResult<GroupDto> {
        let mut group = self.read(command.id, cancel).await?;
        let organization_id = group.organization_id;

        let mut sink = ErrorSink::new();
        let name = sink.capture(GroupName::new(command.name));
        let owner_id = parse_owner(&mut sink, command.owner_id);
        let members = match command.members {
            Some(list) => parse_members(&mut sink, list).map(Some),
            None => Some(None),
        };
        let (Some(name), Some(owner_id), Some(members)) = (name, owner_id, members) else {
            return Err(sink);
        };

        group.name = name;
        group.parent_id = command.parent_id;
        group.description = normalize_description(command.description);
        group.owner_id = owner_id;
        group.active = command.active;
        if let Some(members) = members {
            group.replace_members(members, self.clock.now());
        }

        let id = self
            .pipeline
            .apply(
                ctx,
                self.repo.as_ref(),
                &self.validator,
                Transition::Update(group),
                cancel,
            )
            .await?;
        evict_organization(ctx.cache(), organization_id).await;
        self.read_model(id, cancel).await
    }

    /// Deleting an unknown id is a no-op reported as not found.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: GroupId,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        let group = self.read(id, cancel).await?;
        self.pipeline
            .apply(
                ctx,
                self.repo.as_ref(),
                &self.validator,
                Transition::<Group>::Delete(group.id),
                cancel,
            )
            .await?;
        evict_organization(ctx.cache(), group.organization_id).await;
        Ok(())
    }
}

// Outer `None` means the value was rejected and recorded in `sink`.
fn parse_owner(sink: &mut ErrorSink, owner_id: Option<Uuid>) -> Option<Option<UserId>> {
    match owner_id {
        Some(raw) => sink.capture(UserId::new(raw)).map(Some),
        None => Some(None),
    }
}

fn parse_members(sink: &mut ErrorSink, members: Vec<Uuid>) -> Option<Vec<UserId>> {
    let mut parsed = Vec::with_capacity(members.len());
    let mut valid = true;
    for raw in members {
        match UserId::new(raw) {
            Ok(id) => parsed.push(id),
            Err(_) => {
                sink.validation("members", format!("'{raw}' is not a valid user id"));
                valid = false;
            }
        }
    }
    valid.then_some(parsed)
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
