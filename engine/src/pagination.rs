//! Page slicing and the abbreviated page-number bar

use crate::numerals::to_arabic_indic;
use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 10;

/// Layouts with fewer pages than this list every page
const FULL_RANGE_LIMIT: usize = 8;

/// One entry of the page bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageItem {
    Page { number: usize, active: bool },
    /// Collapsed run of pages; jumps `per_page` pages away from the current one
    Skip { target: usize },
}

impl PageItem {
    fn page(number: usize, current: usize) -> Self {
        PageItem::Page { number, active: number == current }
    }

    /// Page number this entry navigates to
    pub fn target(&self) -> usize {
        match self {
            PageItem::Page { number, .. } => *number,
            PageItem::Skip { target } => *target,
        }
    }

    /// Button text: the page number in Arabic-Indic digits, or an ellipsis
    pub fn label(&self) -> String {
        match self {
            PageItem::Page { number, .. } => to_arabic_indic(&number.to_string()),
            PageItem::Skip { .. } => "...".to_string(),
        }
    }
}

/// Page position over a result list. `current_page` is 1-based and kept in
/// range by the caller (see [`Paginator::clamp`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub current_page: usize,
    pub total_items: usize,
    pub per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Paginator {
    /// `per_page` of zero is treated as one
    pub fn new(per_page: usize) -> Self {
        Self { current_page: 1, total_items: 0, per_page: per_page.max(1) }
    }

    pub fn with_state(current_page: usize, total_items: usize, per_page: usize) -> Self {
        Self { current_page, total_items, per_page: per_page.max(1) }
    }

    /// First item index of the current page
    pub fn start(&self) -> usize {
        self.current_page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// One past the last item index of the current page (not clipped to `total_items`)
    pub fn end(&self) -> usize {
        self.current_page.saturating_mul(self.per_page)
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page)
    }

    /// Bring a requested page into `1..=total_pages` (1 when there are no pages)
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    /// Skip tooltip, e.g. "١٠ صفحات"
    pub fn skip_title(&self) -> String {
        format!("{} صفحات", to_arabic_indic(&self.per_page.to_string()))
    }

    /// Page bar. Up to seven pages are listed in full; beyond that seven
    /// entries with the first and last page always shown and skip markers
    /// around the current page.
    pub fn page_range(&self) -> Vec<PageItem> {
        let tp = self.total_pages();
        let cur = self.current_page;
        let down = PageItem::Skip { target: cur.saturating_sub(self.per_page).max(1) };
        let up = PageItem::Skip { target: cur.saturating_add(self.per_page).min(tp) };
        let page = |n: usize| PageItem::page(n, cur);

        if tp < FULL_RANGE_LIMIT {
            return (1..=tp).map(page).collect();
        }

        if cur > 4 && cur.saturating_add(3) < tp {
            vec![page(1), down, page(cur - 1), page(cur), page(cur + 1), up, page(tp)]
        } else if cur.saturating_add(4) > tp {
            vec![page(1), down, page(tp - 4), page(tp - 3), page(tp - 2), page(tp - 1), page(tp)]
        } else {
            vec![page(1), page(2), page(3), page(4), page(5), up, page(tp)]
        }
    }
}
