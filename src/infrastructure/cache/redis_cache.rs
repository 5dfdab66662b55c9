// src/infrastructure/cache/redis_cache.rs
use crate::application::ports::cache::Cache;
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use std::time::Duration;

const KEY_PREFIX: &str = "backoffice:";

#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Create a cache from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str) -> DomainResult<Self> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| DomainError::Infrastructure(err.to_string()))?;

        Ok(Self { pool })
    }

    async fn connection(&self) -> DomainResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| DomainError::Infrastructure(err.to_string()))
    }
}

fn key(raw: &str) -> String {
    format!("{KEY_PREFIX}{raw}")
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, raw_key: &str) -> DomainResult<Option<String>> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key(raw_key))
            .await
            .map_err(|err| DomainError::Infrastructure(err.to_string()))
    }

    async fn set(&self, raw_key: &str, value: String, ttl: Duration) -> DomainResult<()> {
        let mut conn = self.connection().await?;
        // SET EX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key(raw_key), value, seconds)
            .await
            .map_err(|err| DomainError::Infrastructure(err.to_string()))
    }

    async fn remove(&self, raw_key: &str) -> DomainResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key(raw_key))
            .await
            .map_err(|err| DomainError::Infrastructure(err.to_string()))
    }
}
