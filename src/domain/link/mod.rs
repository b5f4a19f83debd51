//! Link module - blogroll entries shown in the sidebar.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LinkId, Timestamp, ValidationError};

/// A blogroll entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    pub sort: i32,
}

impl NewLink {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        sort: i32,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.into().trim().to_string(),
            url: validate_url(&url.into())?,
            sort,
        })
    }
}

/// A stored blogroll entry. URLs are unique; lists are ordered by `sort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub name: String,
    pub url: String,
    pub sort: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Link {
    pub fn from_new(id: LinkId, new: NewLink, created_at: Timestamp) -> Self {
        Self {
            id,
            name: new.name,
            url: new.url,
            sort: new.sort,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Check a link target and return it trimmed.
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::empty_field("url"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::invalid_format(
            "url",
            "must start with http:// or https://",
        ));
    }
    Ok(url.to_string())
}
