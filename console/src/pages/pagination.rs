//! Pagination footer math.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;

use crate::net::types::Paged;

/// Visible range and control state for one page of a list. Page and limit
/// are always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u32,
}

impl PageWindow {
    #[must_use]
    pub fn new(page: u32, limit: u32, total: u64, total_pages: u32) -> Self {
        Self { page: page.max(1), limit: limit.max(1), total, total_pages }
    }

    /// Window for a server envelope fetched with page size `limit`.
    #[must_use]
    pub fn of<T>(paged: &Paged<T>, limit: u32) -> Self {
        Self::new(paged.page, limit, paged.total, paged.total_pages)
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// 1-based index of the first visible row, 0 for an empty list.
    #[must_use]
    pub fn start(&self) -> u64 {
        if self.total == 0 { 0 } else { u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1 }
    }

    /// 1-based index of the last visible row.
    #[must_use]
    pub fn end(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.limit)).min(self.total)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// A single short page needs no footer.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.total_pages <= 1 && self.total <= u64::from(self.limit)
    }

    #[must_use]
    pub fn range_label(&self) -> String {
        format!("Showing {}\u{2013}{} of {}", self.start(), self.end(), self.total)
    }

    #[must_use]
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages.max(1))
    }

    /// Both labels on one line, or `None` when the footer is hidden.
    #[must_use]
    pub fn footer(&self) -> Option<String> {
        (!self.is_hidden()).then(|| format!("{} \u{b7} {}", self.range_label(), self.page_label()))
    }
}

/// Page an unpaged list on the client into the same envelope the server
/// returns. A page past the end is empty.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Paged<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len();
    let total_pages = u32::try_from(total.div_ceil(limit as usize)).unwrap_or(u32::MAX).max(1);

    let from = (page as usize - 1).saturating_mul(limit as usize).min(total);
    let to = from.saturating_add(limit as usize).min(total);

    Paged { items: items[from..to].to_vec(), total: total as u64, page, total_pages }
}
