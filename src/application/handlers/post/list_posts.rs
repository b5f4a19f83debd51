//! ListPostsHandler - Query handler for post listings.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Page, Paged, TagId, DEFAULT_PAGE_SIZE};
use crate::domain::post::{Post, PostSummary, DEFAULT_EXCERPT_CHARS};
use crate::ports::PostReader;

/// Query for a page of published posts.
#[derive(Debug, Clone, Default)]
pub struct ListPostsQuery {
    /// Raw tag id from the request; blank means no filter.
    pub tag: String,
    /// 1-based page index; 0 disables paging.
    pub page_index: u32,
    /// Page size; `None` uses the handler's page size, `Some(0)` disables paging.
    pub page_size: Option<u32>,
}

impl ListPostsQuery {
    /// Page `page_index` at the handler's page size.
    pub fn index(page_index: u32) -> Self {
        Self {
            tag: String::new(),
            page_index,
            page_size: None,
        }
    }

    pub fn page(page_index: u32, page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::index(page_index)
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Parse an optional tag filter; blank input means no filter.
pub(crate) fn parse_tag_filter(raw: &str) -> Result<Option<TagId>, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(raw.parse()?))
}

/// Page size and excerpt length applied to listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSettings {
    pub page_size: u32,
    pub excerpt_chars: usize,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl ListingSettings {
    pub(crate) fn page(&self, page_index: u32, page_size: Option<u32>) -> Option<Page> {
        Page::from_request(page_index, page_size.unwrap_or(self.page_size))
    }

    pub(crate) fn summarise(&self, posts: Vec<Post>) -> Vec<PostSummary> {
        posts
            .into_iter()
            .map(|post| PostSummary::new(post, self.excerpt_chars))
            .collect()
    }
}

/// Handler for post listings.
pub struct ListPostsHandler {
    reader: Arc<dyn PostReader>,
    settings: ListingSettings,
}

impl ListPostsHandler {
    pub fn new(reader: Arc<dyn PostReader>) -> Self {
        Self {
            reader,
            settings: ListingSettings::default(),
        }
    }

    /// Use the given page size and excerpt length.
    pub fn with_settings(mut self, settings: ListingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Published posts, newest first.
    pub async fn handle(&self, query: ListPostsQuery) -> Result<Paged<PostSummary>, DomainError> {
        let tag = parse_tag_filter(&query.tag)?;
        let page = self.settings.page(query.page_index, query.page_size);

        let items = self.reader.list_published(tag, page).await?;
        let total = self.reader.count_published(tag).await?;
        Ok(Paged::new(self.settings.summarise(items), total, page))
    }

    /// Every post including drafts, for the admin list.
    pub async fn handle_all(&self, tag: &str) -> Result<Vec<Post>, DomainError> {
        let tag = parse_tag_filter(tag)?;
        self.reader.list_all(tag).await
    }
}
