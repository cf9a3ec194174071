use serde::Deserialize;
use std::env;

fn default_per_page() -> i64 {
    env::var("DEFAULT_PER_PAGE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20)
}

fn max_per_page() -> i64 {
    env::var("MAX_PER_PAGE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100)
}

/// Query-string options accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub q: Option<String>,
}

impl PageQuery {
    /// Search term, normalized: `None` when absent or empty.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

/// A resolved page window. `page` is 1-indexed and floored at 1; `per_page`
/// is defaulted and clamped to the configured maximum before any query runs,
/// so totals always reflect the full matching set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
}

impl PageWindow {
    pub fn from_query(query: &PageQuery) -> Self {
        let page = query.page.unwrap_or(1).max(1);

        let mut per_page = query.limit.unwrap_or_else(default_per_page);
        if per_page < 1 {
            per_page = default_per_page();
        }

        // ensure that items per page does not pass the maximum:
        let max = max_per_page();
        if per_page > max {
            per_page = max;
        }

        PageWindow { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        ((self.page - 1) * self.per_page) as u64
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page < total_pages(total, self.per_page)
    }
}

fn total_pages(total: u64, per_page: i64) -> i64 {
    (total as i64 + per_page - 1) / per_page
}

/// Navigation URLs derived from a page window.
#[derive(Debug, PartialEq, Eq)]
pub struct PageLinks {
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

/// Rebuilds the request URL for the adjacent pages: only `page` varies, and
/// `limit` is always the clamped effective value so a client following
/// `next_url` never re-triggers the clamp inconsistently.
pub fn page_links(base_path: &str, q: Option<&str>, window: &PageWindow, total: u64) -> PageLinks {
    let url_for = |page: i64| {
        let mut url = format!("{}?page={}&limit={}", base_path, page, window.per_page);
        if let Some(q) = q {
            url.push_str("&q=");
            url.push_str(&urlencoding::encode(q));
        }
        url
    };

    PageLinks {
        prev_url: if window.has_prev() {
            Some(url_for(window.page - 1))
        } else {
            None
        },
        next_url: if window.has_next(total) {
            Some(url_for(window.page + 1))
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, limit: Option<i64>, q: Option<&str>) -> PageQuery {
        PageQuery {
            page,
            limit,
            q: q.map(String::from),
        }
    }

    #[test]
    fn test_window_defaults() {
        let window = PageWindow::from_query(&query(None, None, None));
        assert_eq!(window.page, 1);
        assert_eq!(window.per_page, 20);
    }

    #[test]
    fn test_page_floors_at_one() {
        assert_eq!(PageWindow::from_query(&query(Some(0), None, None)).page, 1);
        assert_eq!(PageWindow::from_query(&query(Some(-3), None, None)).page, 1);
    }

    #[test]
    fn test_limit_above_maximum_is_silently_clamped() {
        let window = PageWindow::from_query(&query(None, Some(150), None));
        assert_eq!(window.per_page, 100);
    }

    #[test]
    fn test_non_positive_limit_falls_back_to_default() {
        let window = PageWindow::from_query(&query(None, Some(0), None));
        assert_eq!(window.per_page, 20);
    }

    #[test]
    fn test_offset_is_zero_indexed_from_one_indexed_page() {
        let window = PageWindow {
            page: 3,
            per_page: 25,
        };
        assert_eq!(window.offset(), 50);
    }

    #[test]
    fn test_links_absent_on_single_page() {
        let window = PageWindow {
            page: 1,
            per_page: 100,
        };
        let links = page_links("/api/v1/bucketlists/", None, &window, 1);
        assert_eq!(links.prev_url, None);
        assert_eq!(links.next_url, None);
    }

    #[test]
    fn test_links_point_to_adjacent_pages_with_limit_preserved() {
        // three rows, one per page, standing on page 2
        let window = PageWindow {
            page: 2,
            per_page: 1,
        };
        let links = page_links("/api/v1/bucketlists/", None, &window, 3);
        assert_eq!(
            links.prev_url.as_deref(),
            Some("/api/v1/bucketlists/?page=1&limit=1")
        );
        assert_eq!(
            links.next_url.as_deref(),
            Some("/api/v1/bucketlists/?page=3&limit=1")
        );
    }

    #[test]
    fn test_links_carry_the_search_term_encoded() {
        let window = PageWindow {
            page: 2,
            per_page: 20,
        };
        let links = page_links("/api/v1/bucketlists/", Some("the choleric"), &window, 100);
        assert_eq!(
            links.prev_url.as_deref(),
            Some("/api/v1/bucketlists/?page=1&limit=20&q=the%20choleric")
        );
    }

    #[test]
    fn test_no_next_link_on_last_page() {
        let window = PageWindow {
            page: 3,
            per_page: 1,
        };
        let links = page_links("/api/v1/bucketlists/", None, &window, 3);
        assert!(links.prev_url.is_some());
        assert_eq!(links.next_url, None);
    }

    #[test]
    fn test_page_past_the_end_has_no_next() {
        let window = PageWindow {
            page: 9,
            per_page: 10,
        };
        assert!(!window.has_next(30));
        assert!(window.has_prev());
    }

    #[test]
    fn test_search_term_normalization() {
        assert_eq!(query(None, None, None).search_term(), None);
        assert_eq!(query(None, None, Some("")).search_term(), None);
        assert_eq!(query(None, None, Some("kayak")).search_term(), Some("kayak"));
    }
}
