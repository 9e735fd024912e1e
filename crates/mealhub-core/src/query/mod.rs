//! Listing helpers: query-string parsing, pagination and result pages.

mod list_query;
mod pagination;

pub use list_query::{ListQuery, QueryField, RESERVED_PARAMS, SortKey, TypedQuery, project_fields};
pub use pagination::{
    DEFAULT_LIMIT, DEFAULT_PAGE, DEFAULT_SORT_BY, MAX_OFFSET, Pagination, PaginationOptions, SortOrder,
    calculate_pagination,
};

/// One page of a listing plus the numbers needed for pagination metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Count of every matching record, regardless of `page`/`limit`.
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            page,
            limit,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], 13, 1, 6);
        assert_eq!(page.total_pages(), 3);
    }
}
