//! 1-based pagination shared by timelines and search

use std::ops::Range;

use crate::types::Pagination;

/// A 1-based page of at most `limit` items. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: usize,
    limit: usize,
}

impl PageWindow {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of items on the pages before this one
    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Which slice of a sorted result set to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Window(PageWindow),
    /// The whole set as a single page
    All,
}

impl PageRequest {
    /// A window with `page` and `limit` raised to at least 1
    pub fn window(page: usize, limit: usize) -> Self {
        PageRequest::Window(PageWindow {
            page: page.max(1),
            limit: limit.max(1),
        })
    }

    /// Resolve optional caller input against defaults
    pub fn from_options(
        page: Option<usize>,
        limit: Option<usize>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let limit = limit.unwrap_or(default_limit).min(max_limit.max(1));
        Self::window(page.unwrap_or(1), limit)
    }

    /// Index range into a set of `total` items, plus the pagination block
    pub fn apply(&self, total: usize) -> (Range<usize>, Pagination) {
        match *self {
            PageRequest::All => (
                0..total,
                Pagination {
                    page: 1,
                    limit: total,
                    total,
                    has_more: false,
                },
            ),
            PageRequest::Window(window) => {
                let start = window.offset().min(total);
                let end = start.saturating_add(window.limit).min(total);
                (
                    start..end,
                    Pagination {
                        page: window.page,
                        limit: window.limit,
                        total,
                        has_more: window.page.saturating_mul(window.limit) < total,
                    },
                )
            }
        }
    }

    /// `displayOrder` of the first item on this page
    pub fn first_display_order(&self) -> usize {
        match *self {
            PageRequest::All => 1,
            PageRequest::Window(window) => window.offset().saturating_add(1),
        }
    }
}
