//! Result buffer and paginator.
//!
//! DESIGN
//! ======
//! Results arrive either all at once (one HTTP reply) or as a sequence of
//! streamed pages. The buffer appends them in arrival order and tracks
//! `offset`/`limit`/`total` to drive Prev/Next navigation.
//!
//! WINDOW POLICY
//! =============
//! Under [`WindowPolicy::Live`] the visible window is always sliced from the
//! current result set. Under [`WindowPolicy::FreezeOnFirstArrival`] the window
//! is captured the first time results become non-empty while nothing is
//! showing, and later appends do not reflow it, so a page the user is reading
//! stays put while the stream continues. Prev/Next still re-slice the live,
//! accumulating result set under both policies.

#[cfg(test)]
#[path = "results_test.rs"]
mod results_test;

use frames::ResultItem;

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// How the visible window follows incoming results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Recompute the window from the result set on every read.
    #[default]
    Live,
    /// Capture the window on first arrival and keep it until paging.
    FreezeOnFirstArrival,
}

/// Offset/limit/total bookkeeping for the paginator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

impl Pagination {
    fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            total: 0,
        }
    }
}

/// Enabled state of the Prev/Next controls when they are shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Accumulated results plus the pagination state that windows them.
#[derive(Clone, Debug)]
pub struct ResultBuffer {
    items: Vec<ResultItem>,
    pagination: Pagination,
    policy: WindowPolicy,
    /// Captured window, only populated under the freeze policy.
    showing: Vec<ResultItem>,
}

impl Default for ResultBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, WindowPolicy::Live)
    }
}

impl ResultBuffer {
    /// Create an empty buffer. A zero `limit` is raised to 1.
    #[must_use]
    pub fn new(limit: usize, policy: WindowPolicy) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(limit),
            policy,
            showing: Vec::new(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Every result received for the current request, in arrival order.
    #[must_use]
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clear all results and return to the first page.
    pub fn reset(&mut self) {
        self.items.clear();
        self.showing.clear();
        self.pagination.offset = 0;
        self.pagination.total = 0;
    }

    /// Append one page of results.
    pub fn append_page(&mut self, items: Vec<ResultItem>) {
        self.pagination.total += items.len();
        self.items.extend(items);
        if self.policy == WindowPolicy::FreezeOnFirstArrival
            && self.showing.is_empty()
            && !self.items.is_empty()
        {
            self.showing = self.slice_at(self.pagination.offset).to_vec();
        }
    }

    /// Items currently on screen.
    #[must_use]
    pub fn visible_window(&self) -> &[ResultItem] {
        match self.policy {
            WindowPolicy::Live => self.slice_at(self.pagination.offset),
            WindowPolicy::FreezeOnFirstArrival => &self.showing,
        }
    }

    /// Step back one page. No-op on the first page.
    pub fn go_prev(&mut self) {
        let offset = self
            .pagination
            .offset
            .saturating_sub(self.pagination.limit);
        self.move_to(offset);
    }

    /// Step forward one page. No-op when no later page exists.
    pub fn go_next(&mut self) {
        let Pagination {
            offset,
            limit,
            total,
        } = self.pagination;
        let offset = if offset + limit < total {
            offset + limit
        } else {
            offset
        };
        self.move_to(offset);
    }

    /// Prev/Next state, or `None` when everything fits on one page.
    #[must_use]
    pub fn controls(&self) -> Option<PageControls> {
        let Pagination {
            offset,
            limit,
            total,
        } = self.pagination;
        if total <= limit {
            return None;
        }
        Some(PageControls {
            prev_enabled: offset != 0,
            next_enabled: offset + limit < total,
        })
    }

    fn move_to(&mut self, offset: usize) {
        self.pagination.offset = offset;
        if self.policy == WindowPolicy::FreezeOnFirstArrival {
            self.showing = self.slice_at(offset).to_vec();
        }
    }

    fn slice_at(&self, offset: usize) -> &[ResultItem] {
        let start = offset.min(self.items.len());
        let end = (start + self.pagination.limit).min(self.items.len());
        &self.items[start..end]
    }
}
