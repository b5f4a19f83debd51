//! Tag module - post labels and their usage counts.

mod entity;

pub use entity::{normalize_tag_name, PostTag, Tag, TagUsage, MAX_TAG_NAME_LENGTH};
