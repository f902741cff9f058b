//! Pagination parameters and page envelopes.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

/// Requested page window.
///
/// Raw query values are untrusted strings; anything non-numeric or
/// non-positive falls back to the defaults (page 1, limit 10) instead of
/// erroring, matching the listing contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageParams {
    page: u64,
    limit: u64,
}

impl PageParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page > 0 { page } else { DEFAULT_PAGE },
            limit: if limit > 0 { limit } else { DEFAULT_LIMIT },
        }
    }

    /// Parse from raw query-string values.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
        let limit = limit.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
        Self::new(page, limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    /// Assemble a page envelope. `total_pages` is `ceil(total / limit)`.
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            items,
            total,
            total_pages: total.div_ceil(params.limit()),
            current_page: params.page(),
            limit: params.limit(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            current_page: self.current_page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_apply() {
        let p = PageParams::from_raw(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn non_numeric_and_non_positive_fall_back() {
        assert_eq!(PageParams::from_raw(Some("abc"), Some("-3")), PageParams::default());
        assert_eq!(PageParams::from_raw(Some("0"), Some("0")), PageParams::default());
    }

    #[test]
    fn offset_math() {
        let p = PageParams::new(3, 10);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn twenty_five_records_at_limit_ten() {
        let p1 = Page::new(vec![(); 10], 25, PageParams::new(1, 10));
        assert_eq!(p1.total_pages, 3);
        assert_eq!(p1.current_page, 1);

        // Past the end: empty page, same total_pages, the requested page echoed.
        let p4 = Page::<()>::new(vec![], 25, PageParams::new(4, 10));
        assert_eq!(p4.total_pages, 3);
        assert_eq!(p4.current_page, 4);
        assert!(p4.items.is_empty());
    }

    proptest! {
        /// Property: total_pages is always the exact ceiling of total/limit.
        #[test]
        fn total_pages_is_ceiling(total in 0u64..100_000, limit in 1u64..1_000) {
            let page = Page::<()>::new(vec![], total, PageParams::new(1, limit));
            let expected = (total + limit - 1) / limit;
            prop_assert_eq!(page.total_pages, expected);
        }

        /// Property: raw parsing never yields page 0 or limit 0.
        #[test]
        fn params_are_always_positive(page in ".*", limit in ".*") {
            let p = PageParams::from_raw(Some(page.as_str()), Some(limit.as_str()));
            prop_assert!(p.page() >= 1);
            prop_assert!(p.limit() >= 1);
        }
    }
}
