use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;
/// Largest offset the database drivers accept (signed 64-bit).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Normalized page request (1-based page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Rows to skip, saturating at [`MAX_OFFSET`].
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: PageRequest) -> Self {
        let total_pages = if page.limit == 0 {
            0
        } else {
            total.div_ceil(page.limit)
        };
        Self {
            items,
            total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest { page: 2, limit: 10 };
        let result = PaginatedResult::new(vec![1, 2, 3], 21, page);
        assert_eq!(result.total_pages, 3);
        assert_eq!(page.offset(), 10);
    }

    #[test]
    fn offset_never_exceeds_signed_range() {
        let page = PageRequest {
            page: u64::MAX,
            limit: MAX_PAGE_LIMIT,
        };
        assert_eq!(page.offset(), MAX_OFFSET);
        assert_eq!(PageRequest { page: 0, limit: 10 }.offset(), 0);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let result: PaginatedResult<u8> = PaginatedResult::new(vec![], 0, PageRequest::default());
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.page, 1);
    }
}
