// tests/support/mocks/identity.rs
use async_trait::async_trait;
use identity_backoffice::application::{context::Principal, ports::identity::IdentityResolver};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolver returning fixed answers and counting how often it is asked.
#[derive(Default)]
pub struct StaticIdentity {
    pub subject: Option<String>,
    pub name: Option<String>,
    subject_calls: AtomicUsize,
    name_calls: AtomicUsize,
}

impl StaticIdentity {
    pub fn new(subject: Option<&str>, name: Option<&str>) -> Self {
        Self {
            subject: subject.map(ToString::to_string),
            name: name.map(ToString::to_string),
            ..Self::default()
        }
    }

    pub fn subject_calls(&self) -> usize {
        self.subject_calls.load(Ordering::SeqCst)
    }

    pub fn name_calls(&self) -> usize {
        self.name_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn subject_id(&self, _principal: &Principal) -> Option<String> {
        self.subject_calls.fetch_add(1, Ordering::SeqCst);
        self.subject.clone()
    }

    async fn user_name(&self, _principal: &Principal) -> Option<String> {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        self.name.clone()
    }
}
