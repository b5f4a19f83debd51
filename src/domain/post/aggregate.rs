//! Post aggregate entity.
//!
//! Posts carry a Markdown body, a published flag and a read counter.
//! Tags and comments reference posts by id; they are not owned here.

use serde::{Deserialize, Serialize};

use super::excerpt::{excerpt, DEFAULT_EXCERPT_CHARS};
use crate::domain::foundation::{DomainError, PostId, Timestamp, ValidationError};

/// Maximum length for a post title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    body: String,
    is_published: bool,
}

impl NewPost {
    /// Create a draft for insertion.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `OutOfRange` if the title is empty or too long
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        is_published: bool,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            title,
            body: body.into(),
            is_published,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }
}

/// Post aggregate.
///
/// # Invariants
///
/// - `title` is 1-255 characters
/// - `view` never decreases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    title: String,
    body: String,
    view: i64,
    is_published: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Post {
    /// Reconstitute a post from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PostId,
        title: String,
        body: String,
        view: i64,
        is_published: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            body,
            view,
            is_published,
            created_at,
            updated_at,
        }
    }

    /// Materialise a freshly inserted draft.
    pub fn from_new(id: PostId, draft: NewPost, created_at: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            body: draft.body,
            view: 0,
            is_published: draft.is_published,
            created_at,
            updated_at: created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Markdown source.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Times the post has been read.
    pub fn view(&self) -> i64 {
        self.view
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace title, body and published flag.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `OutOfRange` if the title is empty or too long
    pub fn edit(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        is_published: bool,
    ) -> Result<(), DomainError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        self.body = body.into();
        self.is_published = is_published;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Count one more read.
    pub fn record_view(&mut self) {
        self.view = self.view.saturating_add(1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────────

    /// Plain-text teaser of the body, 300 characters followed by `...`.
    pub fn excerpt(&self) -> String {
        excerpt(&self.body, DEFAULT_EXCERPT_CHARS)
    }

    /// Plain-text teaser with a custom length.
    pub fn excerpt_with_limit(&self, max_chars: usize) -> String {
        excerpt(&self.body, max_chars)
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::out_of_range(
            "title",
            1,
            MAX_TITLE_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(())
}
