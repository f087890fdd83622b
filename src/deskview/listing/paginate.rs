//! Pagination stage.
//!
//! Pages are 1-based. A sequence of `n` items split into pages of `s` has
//! `max(1, ceil(n / s))` pages: an empty list still has one (empty) page, so
//! "page 1" is always a valid request. Requested pages outside that range are
//! clamped rather than rejected.

use crate::error::{DeskError, Result};
use serde::Serialize;

/// A requested page: 1-based number and a non-zero size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: usize,
}

impl Page {
    /// Page 0 is read as page 1. A size of 0 is rejected.
    pub fn new(number: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(DeskError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            number: number.max(1),
            size,
        })
    }

    /// Like [`Page::new`], but a zero size is read as 1 instead of rejected.
    pub(crate) fn saturating(number: usize, size: usize) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn first(size: usize) -> Result<Self> {
        Self::new(1, size)
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// One page of results plus the bookkeeping a pager needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Paged<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// 1-based inclusive bounds of the items on this page, `None` when empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let start = (self.page - 1) * self.page_size + 1;
        Some((start, start + self.items.len() - 1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

pub fn total_pages(count: usize, size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    count.div_ceil(size).max(1)
}

pub fn clamp_page(number: usize, count: usize, size: usize) -> usize {
    number.clamp(1, total_pages(count, size))
}

/// Returns the requested page of `items`, clamping the page number into range.
pub fn paginate<T>(items: Vec<T>, page: Page) -> Paged<T> {
    let total_items = items.len();
    let total = total_pages(total_items, page.size);
    let number = page.number.min(total);
    let start = (number - 1) * page.size;

    let items: Vec<T> = items.into_iter().skip(start).take(page.size).collect();

    Paged {
        items,
        page: number,
        page_size: page.size,
        total_items,
        total_pages: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_page_size() {
        assert!(matches!(Page::new(1, 0), Err(DeskError::Validation(_))));
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        assert_eq!(Page::new(0, 10).unwrap().number(), 1);
    }

    #[test]
    fn slices_the_requested_page() {
        let items: Vec<u32> = (1..=25).collect();
        let paged = paginate(items, Page::new(2, 10).unwrap());
        assert_eq!(paged.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(paged.total_pages, 3);
        assert_eq!(paged.total_items, 25);
        assert!(paged.has_next());
        assert!(paged.has_prev());
        assert_eq!(paged.item_range(), Some((11, 20)));
    }

    #[test]
    fn last_page_may_be_short() {
        let items: Vec<u32> = (1..=25).collect();
        let paged = paginate(items, Page::new(3, 10).unwrap());
        assert_eq!(paged.items, vec![21, 22, 23, 24, 25]);
        assert!(!paged.has_next());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let items: Vec<u32> = (1..=25).collect();
        let paged = paginate(items, Page::new(99, 10).unwrap());
        assert_eq!(paged.page, 3);
        assert_eq!(paged.items.len(), 5);
    }

    #[test]
    fn empty_input_has_one_empty_page() {
        let paged = paginate(Vec::<u32>::new(), Page::new(4, 10).unwrap());
        assert_eq!(paged.page, 1);
        assert_eq!(paged.total_pages, 1);
        assert!(paged.items.is_empty());
        assert_eq!(paged.item_range(), None);
    }

    #[test]
    fn pages_concatenate_to_the_full_sequence() {
        for n in 0..40usize {
            for size in 1..12usize {
                let items: Vec<usize> = (0..n).collect();
                let pages = total_pages(n, size);
                let mut rebuilt = Vec::new();
                for number in 1..=pages {
                    let page = paginate(items.clone(), Page::new(number, size).unwrap());
                    assert_eq!(page.page, number);
                    rebuilt.extend(page.items);
                }
                assert_eq!(rebuilt, items, "n={} size={}", n, size);
            }
        }
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(0, 30, 10), 1);
        assert_eq!(clamp_page(2, 30, 10), 2);
        assert_eq!(clamp_page(7, 30, 10), 3);
        assert_eq!(clamp_page(5, 0, 10), 1);
    }
}
