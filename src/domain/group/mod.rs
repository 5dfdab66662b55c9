pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{Group, GroupFilter, GroupSummary, GroupUser};
pub use repository::GroupRepository;
pub use value_objects::{GroupId, GroupName, GroupSortField};
