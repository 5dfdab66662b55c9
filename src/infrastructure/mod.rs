// src/infrastructure/mod.rs
pub mod cache;
pub mod database;
pub mod identity;
pub mod repositories;
pub mod time;
pub mod util;
