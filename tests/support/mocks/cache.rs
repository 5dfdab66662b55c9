// tests/support/mocks/cache.rs
use async_trait::async_trait;
use identity_backoffice::application::ports::cache::Cache;
use identity_backoffice::domain::errors::{DomainError, DomainResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Cache without expiry that records hits, writes and removals. When
/// `failing` is set every operation errors.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, String>>,
    pub failing: AtomicBool,
    hits: AtomicUsize,
    sets: AtomicUsize,
    removes: AtomicUsize,
}

impl RecordingCache {
    pub fn failing() -> Self {
        let cache = Self::default();
        cache.failing.store(true, Ordering::SeqCst);
        cache
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    fn check(&self) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::Infrastructure("cache unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Cache for RecordingCache {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.check()?;
        let value = self.entries.lock().unwrap().get(key).cloned();
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, _ttl: Duration) -> DomainResult<()> {
        self.check()?;
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        self.check()?;
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
