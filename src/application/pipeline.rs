// src/application/pipeline.rs
//! Validate, mutate, persist and audit one entity per call.
use crate::application::{
    context::RequestContext,
    error::{ErrorSink, ServiceResult, ValidationErrors},
    ports::time::Clock,
};
use crate::domain::audit::{AuditEvent, AuditResult};
use crate::domain::entity::{AuditStamp, ChangeSet, Entity, EntityStore};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum Transition<E: Entity> {
    Insert(E),
    Update(E),
    Delete(E::Id),
}

impl<E: Entity> Transition<E> {
    pub fn entity_id(&self) -> E::Id {
        match self {
            Transition::Insert(entity) | Transition::Update(entity) => entity.id(),
            Transition::Delete(id) => *id,
        }
    }

    pub fn entity(&self) -> Option<&E> {
        match self {
            Transition::Insert(entity) | Transition::Update(entity) => Some(entity),
            Transition::Delete(_) => None,
        }
    }

    fn verb(&self) -> (&'static str, &'static str) {
        match self {
            Transition::Insert(_) => ("create", "created"),
            Transition::Update(_) => ("update", "updated"),
            Transition::Delete(_) => ("delete", "deleted"),
        }
    }

    fn describe(&self) -> String {
        match self.entity() {
            Some(entity) => format!("{} '{}' ({})", E::KIND, entity.label(), entity.id()),
            None => format!("{} {}", E::KIND, self.entity_id()),
        }
    }
}

/// Entity specific checks run before anything is written. Returning an
/// error (as opposed to a non-empty list) means the checks themselves
/// could not be carried out.
#[async_trait]
pub trait EntityValidator<E: Entity>: Send + Sync {
    async fn validate(
        &self,
        transition: &Transition<E>,
        cancel: &CancellationToken,
    ) -> DomainResult<ValidationErrors>;
}

pub struct EntityPipeline {
    clock: Arc<dyn Clock>,
}

impl EntityPipeline {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Applies `transition` through `store`.
    ///
    /// Validation failures return before any storage call and are not
    /// audited. Every attempt that reaches the store produces exactly one
    /// `ConfigurationChange` audit record, successful or not. Storage
    /// errors never escape; they come back as critical errors in the sink.
    pub async fn apply<E, S, V>(
        &self,
        ctx: &RequestContext,
        store: &S,
        validator: &V,
        transition: Transition<E>,
        cancel: &CancellationToken,
    ) -> ServiceResult<E::Id>
    where
        E: Entity,
        S: EntityStore<E> + ?Sized,
        V: EntityValidator<E> + ?Sized,
    {
        let mut sink = ErrorSink::new();
        let (action, past) = transition.verb();
        let description = transition.describe();
        let id = transition.entity_id();

        match validator.validate(&transition, cancel).await {
            Ok(errors) if errors.is_empty() => {}
            Ok(errors) => {
                debug!(kind = E::KIND, %id, action, errors = errors.len(), "validation rejected change");
                sink.extend_validation(errors);
                return Err(sink);
            }
            Err(err) => {
                warn!(kind = E::KIND, %id, action, error = %err, "validation could not be completed");
                sink.critical(format!("could not validate {description}: {err}"));
                return Err(sink);
            }
        }

        let now = self.clock.now();
        let mut changes = ChangeSet::new();
        match transition {
            Transition::Insert(mut entity) => {
                *entity.stamp_mut() = AuditStamp::new(now);
                changes.add(entity);
            }
            Transition::Update(mut entity) => {
                let actor = ctx.current_user_id_opt().await;
                entity.stamp_mut().touch(now, actor);
                changes.update(entity);
            }
            Transition::Delete(id) => {
                changes.remove(id);
            }
        }

        let succeeded = match store.commit(changes, cancel).await {
            Ok(0) => {
                warn!(kind = E::KIND, %id, action, "commit affected no rows");
                sink.critical(format!("{description} was not {past}: no rows affected"));
                false
            }
            Ok(rows) => {
                info!(kind = E::KIND, %id, action, rows, "change committed");
                true
            }
            Err(err) => {
                warn!(kind = E::KIND, %id, action, error = %err, "commit failed");
                sink.critical(format!("failed to {action} {description}: {err}"));
                false
            }
        };

        let message = if succeeded {
            format!("{description} {past}")
        } else {
            format!("failed to {action} {description}")
        };
        let entry = ctx
            .audit_entry(
                AuditEvent::ConfigurationChange,
                AuditResult::from_outcome(succeeded),
            )
            .await
            .with_message(message)
            .with_request(format!("{}.{}", E::KIND, action))
            .with_location(format!("{}/{}", E::KIND, id));
        ctx.audit().log(entry, cancel).await;

        if succeeded { Ok(id) } else { Err(sink) }
    }
}
