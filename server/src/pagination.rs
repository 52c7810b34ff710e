//! Page windowing and the `X-Pagination` metadata.

use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: u32 = 20;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Name of the response header carrying [`PaginationMetadata`] as JSON.
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Raw paging parameters from the query string. Out-of-range values are
/// tolerated here and clamped by [`PageRequest::from_query`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request, silently clamping the number to at least 1 and the
    /// size into `[1, MAX_PAGE_SIZE]`.
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: normalize(page_number, 1, u32::MAX as i64),
            page_size: normalize(page_size, 1, MAX_PAGE_SIZE as i64),
        }
    }

    pub fn from_query(query: PageQuery) -> Self {
        Self::new(
            query.page_number.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64),
        )
    }

    pub fn offset(&self) -> u64 {
        (self.page_number as u64 - 1) * self.page_size as u64
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Cuts this page out of an already filtered and ordered sequence.
    pub fn window<T>(&self, items: Vec<T>) -> PageSlice<T> {
        let total_count = items.len() as u64;
        let items = items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.page_size as usize)
            .collect();
        PageSlice { items, total_count }
    }
}

fn normalize(value: i64, min: i64, max: i64) -> u32 {
    value.clamp(min, max) as u32
}

/// One page of items plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> PageSlice<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageSlice<U> {
        PageSlice {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// Builds the URI of another page of the same listing.
pub trait PageLinkGenerator: Send + Sync {
    fn page_link(&self, page_number: u32, page_size: u32) -> Option<String>;
}

/// Links to `POST /api/events` under a public base URL.
#[derive(Debug, Clone)]
pub struct EventsPageLinks {
    base_url: String,
}

impl EventsPageLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl PageLinkGenerator for EventsPageLinks {
    fn page_link(&self, page_number: u32, page_size: u32) -> Option<String> {
        Some(format!(
            "{}/api/events?pageNumber={}&pageSize={}",
            self.base_url, page_number, page_size
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u64,
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

impl PaginationMetadata {
    pub fn new(request: PageRequest, total_count: u64, links: &dyn PageLinkGenerator) -> Self {
        let total_pages = total_count.div_ceil(request.page_size as u64);
        let current_page = request.page_number;

        let previous_page_link = if current_page > 1 && total_pages > 0 {
            let previous = (current_page as u64 - 1).min(total_pages) as u32;
            links.page_link(previous, request.page_size)
        } else {
            None
        };
        let next_page_link = if (current_page as u64) < total_pages {
            links.page_link(current_page + 1, request.page_size)
        } else {
            None
        };

        Self {
            total_count,
            page_size: request.page_size,
            current_page,
            total_pages,
            previous_page_link,
            next_page_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLinks;

    impl PageLinkGenerator for NoLinks {
        fn page_link(&self, _: u32, _: u32) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_page_number_is_clamped_to_one() {
        for number in [0, -1, i64::MIN] {
            let page = PageRequest::new(number, 10);
            assert_eq!(page.page_number, 1);
            assert_eq!(PageRequest::new(page.page_number as i64, 10), page);
        }
    }

    #[test]
    fn test_page_size_is_clamped_to_bounds() {
        assert_eq!(PageRequest::new(1, 0).page_size, 1);
        assert_eq!(PageRequest::new(1, -5).page_size, 1);
        assert_eq!(PageRequest::new(1, 21).page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 1_000).page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 7).page_size, 7);
    }

    #[test]
    fn test_defaults_from_empty_query() {
        assert_eq!(PageRequest::from_query(PageQuery::default()), PageRequest::default());
        assert_eq!(PageRequest::default().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_window_slices_requested_page() {
        let items: Vec<u32> = (1..=12).collect();
        let page = PageRequest::new(2, 10).window(items);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_count, 12);
    }

    #[test]
    fn test_window_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=5).collect();
        let page = PageRequest::new(3, 5).window(items);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_metadata_counts_pages() {
        let meta = PaginationMetadata::new(PageRequest::new(2, 10), 12, &NoLinks);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.current_page, 2);

        let empty = PaginationMetadata::new(PageRequest::default(), 0, &NoLinks);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_metadata_links() {
        let links = EventsPageLinks::new("http://localhost:3001/");
        let meta = PaginationMetadata::new(PageRequest::new(2, 5), 15, &links);
        assert_eq!(
            meta.previous_page_link.as_deref(),
            Some("http://localhost:3001/api/events?pageNumber=1&pageSize=5")
        );
        assert_eq!(
            meta.next_page_link.as_deref(),
            Some("http://localhost:3001/api/events?pageNumber=3&pageSize=5")
        );

        let first = PaginationMetadata::new(PageRequest::new(1, 5), 3, &links);
        assert_eq!(first.previous_page_link, None);
        assert_eq!(first.next_page_link, None);

        // Past the end of an empty listing there is nothing to go back to
        let empty = PaginationMetadata::new(PageRequest::new(3, 5), 0, &links);
        assert_eq!(empty.previous_page_link, None);
        assert_eq!(empty.next_page_link, None);
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let meta = PaginationMetadata::new(PageRequest::new(1, 10), 25, &NoLinks);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalCount"], 25);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageSize"], 10);
    }
}
