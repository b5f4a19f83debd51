use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, PostId, TagId, Timestamp, ValidationError};

/// Maximum length for a tag name, in characters.
pub const MAX_TAG_NAME_LENGTH: usize = 64;

/// A label shared by any number of posts. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Tag {
    /// Reconstitute a tag from persistence (no validation).
    pub fn reconstitute(
        id: TagId,
        name: String,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Change the tag's name.
    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = normalize_tag_name(name)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Trim a user-supplied tag name and check it is usable.
pub fn normalize_tag_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("tag_name"));
    }
    let len = name.chars().count();
    if len > MAX_TAG_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            "tag_name",
            1,
            MAX_TAG_NAME_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(name.to_string())
}

/// A tag with the number of published posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag: Tag,
    pub total: u64,
}

/// Association between a post and one of its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostTag {
    pub post_id: PostId,
    pub tag_id: TagId,
}

impl PostTag {
    pub fn new(post_id: PostId, tag_id: TagId) -> Self {
        Self { post_id, tag_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_name_is_trimmed() {
        assert_eq!(normalize_tag_name("  rust ").unwrap(), "rust");
    }

    #[test]
    fn blank_tag_name_is_rejected() {
        assert!(normalize_tag_name(" \t").is_err());
    }

    #[test]
    fn overlong_tag_name_is_rejected() {
        assert!(normalize_tag_name(&"t".repeat(MAX_TAG_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn rename_updates_name() {
        let now = Timestamp::now();
        let mut tag = Tag::reconstitute(TagId::from_db(1), "go".into(), now, now);
        tag.rename(" rust ").unwrap();
        assert_eq!(tag.name(), "rust");
    }
}
