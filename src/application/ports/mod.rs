// src/application/ports/mod.rs
pub mod cache;
pub mod identity;
pub mod time;
pub mod util;

