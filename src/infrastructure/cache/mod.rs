// src/infrastructure/cache/mod.rs
mod memory;
mod redis_cache;

pub use memory::InMemoryCache;
pub use redis_cache::RedisCache;
