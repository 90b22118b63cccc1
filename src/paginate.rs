//! Page arithmetic and the compressed page-number strip.

use std::fmt;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pages listed individually before the strip starts eliding ranges.
const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gap {
    /// Pages skipped between the first page and the window.
    Leading,
    /// Pages skipped between the window and the last page.
    Trailing,
}

/// An entry of the page strip: a real 1-based page, or an elided range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSlot {
    Page(usize),
    Ellipsis(Gap),
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Page(page) => write!(f, "{page}"),
            PageSlot::Ellipsis(_) => f.write_str("..."),
        }
    }
}

/// Slice bounds of one page over `total_items` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageWindow {
    /// Clamps `page` into `1..=max(total_pages, 1)`; a zero page size counts as 1.
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let page = page.clamp(1, total_pages.max(1));
        let start_index = ((page - 1) * page_size).min(total_items);
        let end_index = (start_index + page_size).min(total_items);
        PageWindow {
            page,
            page_size,
            total_items,
            total_pages,
            start_index,
            end_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Page strip for a pager: every page when there are at most five, otherwise
/// the first and last page around a window of up to three pages centred on
/// `current_page`, with [`PageSlot::Ellipsis`] in place of skipped ranges.
pub fn page_numbers(current_page: usize, total_pages: usize) -> Vec<PageSlot> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageSlot::Page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let last_inner = total_pages - 1;
    let (start, end) = if current <= 2 {
        (2, last_inner.min(4))
    } else if current >= last_inner {
        ((total_pages - 3).max(2), last_inner)
    } else {
        ((current - 1).max(2), (current + 1).min(last_inner))
    };

    let mut slots = Vec::with_capacity(7);
    slots.push(PageSlot::Page(1));
    if start > 2 {
        slots.push(PageSlot::Ellipsis(Gap::Leading));
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < last_inner {
        slots.push(PageSlot::Ellipsis(Gap::Trailing));
    }
    slots.push(PageSlot::Page(total_pages));
    slots
}
