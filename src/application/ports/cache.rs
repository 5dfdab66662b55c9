// src/application/ports/cache.rs
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use std::time::Duration;

/// String key/value cache shared by request contexts. Values are opaque to
/// the cache; services store JSON.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> DomainResult<()>;
    async fn remove(&self, key: &str) -> DomainResult<()>;
}
