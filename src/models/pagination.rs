use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside every list response.
///
/// Mirrors the remote API's page-number envelope. A `next`/`previous` value
/// of `0` means there is no such page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of the following page, or 0 on the last page.
    #[serde(default)]
    pub next: u64,
    /// Number of the preceding page, or 0 on the first page.
    #[serde(default)]
    pub previous: u64,
    /// Total number of items matching the query across all pages.
    #[serde(default)]
    pub count: u64,
    /// Page number of this response (1-based).
    #[serde(default = "default_current")]
    pub current: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u64,
    /// 1-based index of the first item on this page (0 when empty).
    #[serde(default)]
    pub start_index: u64,
    /// 1-based index of the last item on this page (0 when empty).
    #[serde(default)]
    pub end_index: u64,
}

impl Pagination {
    pub fn current_page(&self) -> u64 {
        self.current
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn item_count(&self) -> u64 {
        self.count
    }

    pub fn has_next(&self) -> bool {
        self.next > 0
    }
}

fn default_current() -> u64 {
    1
}

/// A single page of results from any remote list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub pagination: Pagination,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, pagination: Pagination) -> Self {
        Self {
            pagination,
            results,
        }
    }

    /// Transform the results while passing the pagination envelope through unchanged.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            pagination: self.pagination,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let json = r#"{
            "pagination": {
                "next": 0,
                "previous": 1,
                "count": 25,
                "current": 2,
                "total_pages": 2,
                "start_index": 21,
                "end_index": 25
            },
            "results": ["x", "y"]
        }"#;

        let page: Page<String> = serde_json::from_str(json).unwrap();
        assert_eq!(page.pagination.current_page(), 2);
        assert_eq!(page.pagination.total_pages(), 2);
        assert_eq!(page.pagination.item_count(), 25);
        assert_eq!((page.pagination.start_index, page.pagination.end_index), (21, 25));
        assert!(!page.pagination.has_next());
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_missing_fields_default() {
        let page: Page<String> =
            serde_json::from_str(r#"{"pagination": {}, "results": []}"#).unwrap();
        assert_eq!(page.pagination.current_page(), 1);
        assert_eq!(
            page.pagination,
            Pagination {
                current: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_map_keeps_pagination() {
        let pagination = Pagination {
            count: 3,
            total_pages: 1,
            ..Default::default()
        };
        let page = Page::new(vec![1, 2, 3], pagination.clone()).map(|n| n * 10);
        assert_eq!(page.results, vec![10, 20, 30]);
        assert_eq!(page.pagination, pagination);
    }
}
