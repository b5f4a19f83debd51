//! Page requests and paged results.

use serde::{Deserialize, Serialize};

/// Posts per listing page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    index: u32,
    size: u32,
}

impl Page {
    /// Builds a page request from raw request values.
    ///
    /// A zero index or zero size means "no pagination" and yields `None`.
    pub fn from_request(index: u32, size: u32) -> Option<Self> {
        if index == 0 || size == 0 {
            return None;
        }
        Some(Self { index, size })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows to return.
    pub fn limit(&self) -> i64 {
        self.size as i64
    }

    /// Rows to skip, saturating at `i64::MAX`.
    pub fn offset(&self) -> i64 {
        (self.index as i64 - 1).saturating_mul(self.size as i64)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: Option<Page>,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: u64, page: Option<Page>) -> Self {
        Self { items, total, page }
    }

    /// Number of pages needed for `total` rows; 1 when unpaginated and non-empty.
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        match self.page {
            Some(page) => self.total.div_ceil(page.size() as u64),
            None => 1,
        }
    }

    /// Whether rows exist past this page.
    pub fn has_more(&self) -> bool {
        match self.page {
            Some(page) => (page.index() as u64) < self.total_pages(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_index_disables_paging() {
        assert!(Page::from_request(0, 10).is_none());
        assert!(Page::from_request(1, 0).is_none());
    }

    #[test]
    fn first_page_starts_at_zero() {
        let page = Page::from_request(1, 10).unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn third_page_skips_two_pages() {
        let page = Page::from_request(3, 8).unwrap();
        assert_eq!(page.offset(), 16);
    }

    #[test]
    fn huge_page_request_saturates() {
        let page = Page::from_request(u32::MAX, u32::MAX).unwrap();
        assert_eq!(page.offset(), i64::MAX);
        assert_eq!(page.limit(), u32::MAX as i64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let paged: Paged<u8> = Paged::new(vec![], 21, Page::from_request(1, 10));
        assert_eq!(paged.total_pages(), 3);
        assert!(paged.has_more());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let paged: Paged<u8> = Paged::new(vec![], 0, Page::from_request(1, 10));
        assert_eq!(paged.total_pages(), 0);
        assert!(!paged.has_more());
    }

    #[test]
    fn unpaged_result_is_single_page() {
        let paged = Paged::new(vec![1, 2, 3], 3, None);
        assert_eq!(paged.total_pages(), 1);
        assert!(!paged.has_more());
    }

    proptest! {
        #[test]
        fn offset_never_panics(index in 1u32.., size in 1u32..) {
            let page = Page::from_request(index, size).unwrap();
            prop_assert!(page.offset() >= 0);
        }

        #[test]
        fn pages_tile_the_result_set(index in 1u32..1000, size in 1u32..500) {
            let page = Page::from_request(index, size).unwrap();
            let next = Page::from_request(index + 1, size).unwrap();
            prop_assert_eq!(page.offset() + page.limit(), next.offset());
        }

        #[test]
        fn total_pages_covers_every_row(total in 0u64..100_000, size in 1u32..500) {
            let paged: Paged<()> = Paged::new(vec![], total, Page::from_request(1, size));
            let pages = paged.total_pages();
            prop_assert!(pages * size as u64 >= total);
            if pages > 0 {
                prop_assert!((pages - 1) * (size as u64) < total);
            }
        }
    }
}
