use serde::Serialize;

/// Validated pagination window. `page` is 1-based; `limit` defaults to the
/// configured page size and is capped at the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageParams {
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let defaults = &crate::config::config().pagination;
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(defaults.default_limit).clamp(1, defaults.max_limit);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// One page of results plus the window bookkeeping the clients expect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, params: PageParams) -> Self {
        let total_pages = if total_docs == 0 {
            0
        } else {
            (total_docs + params.limit - 1) / params.limit
        };
        Self { docs, total_docs, page: params.page, limit: params.limit, total_pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = PageParams::from_query(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn clamps_page_and_limit() {
        let p = PageParams::from_query(Some(0), Some(-5));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);

        let max = crate::config::config().pagination.max_limit;
        let p = PageParams::from_query(Some(3), Some(max + 1000));
        assert_eq!(p.limit, max);
        assert_eq!(p.offset(), 2 * max);
    }

    #[test]
    fn total_pages_rounds_up() {
        let params = PageParams { page: 1, limit: 10 };
        assert_eq!(Page::<i32>::new(vec![], 0, params).total_pages, 0);
        assert_eq!(Page::<i32>::new(vec![], 10, params).total_pages, 1);
        assert_eq!(Page::<i32>::new(vec![], 11, params).total_pages, 2);
    }
}
