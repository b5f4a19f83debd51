//! ListArchivePostsHandler - Query handler for one archive month.

use std::sync::Arc;

use super::list_posts::ListingSettings;
use crate::domain::foundation::{ArchiveMonth, DomainError, Paged};
use crate::domain::post::PostSummary;
use crate::ports::PostReader;

/// Query for published posts of one month.
#[derive(Debug, Clone)]
pub struct ListArchivePostsQuery {
    /// Raw year, e.g. `"2024"`.
    pub year: String,
    /// Raw month, `"1"` through `"12"`.
    pub month: String,
    pub page_index: u32,
    /// `None` uses the handler's page size, `Some(0)` disables paging.
    pub page_size: Option<u32>,
}

/// Handler for archive listings.
pub struct ListArchivePostsHandler {
    reader: Arc<dyn PostReader>,
    settings: ListingSettings,
}

impl ListArchivePostsHandler {
    pub fn new(reader: Arc<dyn PostReader>) -> Self {
        Self {
            reader,
            settings: ListingSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ListingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn handle(
        &self,
        query: ListArchivePostsQuery,
    ) -> Result<Paged<PostSummary>, DomainError> {
        let month = ArchiveMonth::parse(&query.year, &query.month)?;
        let page = self.settings.page(query.page_index, query.page_size);

        let items = self.reader.list_by_archive(month, page).await?;
        let total = self.reader.count_by_archive(month).await?;
        Ok(Paged::new(self.settings.summarise(items), total, page))
    }
}
