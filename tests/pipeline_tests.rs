mod support;

use async_trait::async_trait;
use identity_backoffice::application::error::{FieldError, ValidationErrors};
use identity_backoffice::application::pipeline::{EntityPipeline, EntityValidator, Transition};
use identity_backoffice::domain::audit::AuditResult;
use identity_backoffice::domain::entity::{Change, ChangeSet, EntityStore};
use identity_backoffice::domain::errors::{DomainError, DomainResult};
use identity_backoffice::domain::group::{Group, GroupId};
use identity_backoffice::domain::organization::OrganizationId;
use identity_backoffice::infrastructure::time::FixedClock;
use std::sync::{Arc, Mutex};
use support::*;
use tokio_util::sync::CancellationToken;

/// Store that records what it was asked to commit and answers with a
/// fixed row count.
struct ScriptedStore {
    rows: u64,
    committed: Mutex<Vec<Change<Group>>>,
}

impl ScriptedStore {
    fn answering(rows: u64) -> Self {
        Self {
            rows,
            committed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EntityStore<Group> for ScriptedStore {
    async fn find(&self, _id: GroupId, _cancel: &CancellationToken) -> DomainResult<Option<Group>> {
        Ok(None)
    }

    async fn commit(&self, changes: ChangeSet<Group>, _cancel: &CancellationToken) -> DomainResult<u64> {
        self.committed.lock().unwrap().extend(changes);
        Ok(self.rows)
    }
}

enum Verdict {
    Accept,
    Reject,
    Broken,
}

#[async_trait]
impl EntityValidator<Group> for Verdict {
    async fn validate(
        &self,
        _transition: &Transition<Group>,
        _cancel: &CancellationToken,
    ) -> DomainResult<ValidationErrors> {
        match self {
            Verdict::Accept => Ok(Vec::new()),
            Verdict::Reject => Ok(vec![FieldError::new("name", "reserved")]),
            Verdict::Broken => Err(DomainError::Infrastructure("lookup timed out".into())),
        }
    }
}

fn pipeline() -> EntityPipeline {
    EntityPipeline::new(Arc::new(DummyClock))
}

fn pipeline_with(clock: Arc<FixedClock>) -> EntityPipeline {
    EntityPipeline::new(clock)
}

#[tokio::test]
async fn insert_restamps_and_audits_success() {
    let h = harness();
    let store = ScriptedStore::answering(1);
    let mut group = GroupBuilder::new(OrganizationId::generate(), "ops").build();
    group.stamp.created_at = fixed_now() - chrono::Duration::days(30);
    let id = group.id;

    let returned = pipeline()
        .apply(&h.ctx(), &store, &Verdict::Accept, Transition::Insert(group), &cancel())
        .await
        .unwrap();

    assert_eq!(returned, id);
    let committed = store.committed.lock().unwrap();
    match committed.as_slice() {
        [Change::Add(saved)] => {
            assert_eq!(saved.stamp.created_at, fixed_now());
            assert_eq!(saved.stamp.updated_at, None);
        }
        other => panic!("unexpected changes: {other:?}"),
    }
    assert_eq!(h.audit_results(), vec![AuditResult::Success]);
}

#[tokio::test]
async fn rejected_change_never_reaches_the_store() {
    let h = harness();
    let store = ScriptedStore::answering(1);
    let group = GroupBuilder::new(OrganizationId::generate(), "ops").build();

    let err = pipeline()
        .apply(&h.ctx(), &store, &Verdict::Reject, Transition::Update(group), &cancel())
        .await
        .unwrap_err();

    assert_eq!(validation_fields(&err), vec!["name"]);
    assert!(store.committed.lock().unwrap().is_empty());
    assert_eq!(h.audit.len(), 0);
}

#[tokio::test]
async fn validator_failure_is_critical_and_not_audited() {
    let h = harness();
    let store = ScriptedStore::answering(1);

    let err = pipeline()
        .apply(
            &h.ctx(),
            &store,
            &Verdict::Broken,
            Transition::<Group>::Delete(GroupId::generate()),
            &cancel(),
        )
        .await
        .unwrap_err();

    assert!(has_critical(&err));
    assert!(store.committed.lock().unwrap().is_empty());
    assert_eq!(h.audit.len(), 0);
}

#[tokio::test]
async fn commit_touching_no_rows_is_a_failed_change() {
    let h = harness();
    let store = ScriptedStore::answering(0);
    let group = GroupBuilder::new(OrganizationId::generate(), "ops").build();

    let err = pipeline()
        .apply(&h.ctx(), &store, &Verdict::Accept, Transition::Update(group), &cancel())
        .await
        .unwrap_err();

    assert!(has_critical(&err));
    assert_eq!(h.audit_results(), vec![AuditResult::Fail]);
    assert_eq!(h.audit.entries()[0].request.as_deref(), Some("group.update"));
}

#[tokio::test]
async fn update_is_stamped_with_time_and_actor() {
    let h = harness();
    let store = ScriptedStore::answering(1);
    let group = GroupBuilder::new(OrganizationId::generate(), "ops").build();
    let clock = Arc::new(FixedClock::new(fixed_now()));
    clock.advance(chrono::Duration::hours(2));

    pipeline_with(clock)
        .apply(&h.ctx(), &store, &Verdict::Accept, Transition::Update(group), &cancel())
        .await
        .unwrap();

    let committed = store.committed.lock().unwrap();
    let Some(Change::Update(saved)) = committed.first() else {
        panic!("expected an update");
    };
    assert_eq!(saved.stamp.created_at, fixed_now());
    assert_eq!(
        saved.stamp.updated_at,
        Some(fixed_now() + chrono::Duration::hours(2))
    );
    assert_eq!(saved.stamp.updated_by, Some(admin()));
}
