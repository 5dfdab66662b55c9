// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod audit_repo;
pub mod cache;
pub mod group_repo;
pub mod identity;
pub mod organization_repo;
pub mod paging;
pub mod time;
pub mod util;

pub use audit_repo::InMemoryAuditRepo;
pub use cache::RecordingCache;
pub use group_repo::InMemoryGroupRepo;
pub use identity::StaticIdentity;
pub use organization_repo::InMemoryOrganizationRepo;
pub use time::fixed_now;
pub use util::{DummyClock, DummySlug};
