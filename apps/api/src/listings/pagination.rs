use std::num::NonZeroUsize;

use serde::Serialize;

pub const DEFAULT_JOBS_PER_PAGE: usize = 8;

/// Fixed-size, 1-based pagination over an already ordered sequence.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: NonZeroUsize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// `ceil(total / size)`; zero items means zero pages.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size())
    }

    /// Items `[(page-1)*size, page*size)`, clamped to the sequence. Page 0 and
    /// pages past the end are empty.
    pub fn slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let Some(start) = page
            .checked_sub(1)
            .and_then(|index| index.checked_mul(self.page_size()))
        else {
            return &[];
        };
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size()).min(items.len());
        &items[start..end]
    }

    pub fn page<T: Clone>(&self, items: &[T], page: usize) -> Page<T> {
        Page {
            items: self.slice(items, page).to_vec(),
            page,
            page_size: self.page_size(),
            total_items: items.len(),
            total_pages: self.total_pages(items.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(size: usize) -> Paginator {
        Paginator::new(NonZeroUsize::new(size).unwrap())
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = paginator(8);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(8), 1);
        assert_eq!(p.total_pages(9), 2);
        assert_eq!(p.total_pages(17), 3);
    }

    #[test]
    fn test_slice_bounds() {
        let items: Vec<u32> = (1..=10).collect();
        let p = paginator(4);
        assert_eq!(p.slice(&items, 1), &[1, 2, 3, 4]);
        assert_eq!(p.slice(&items, 2), &[5, 6, 7, 8]);
        assert_eq!(p.slice(&items, 3), &[9, 10]);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items: Vec<u32> = (1..=10).collect();
        let p = paginator(4);
        assert!(p.slice(&items, 0).is_empty());
        assert!(p.slice(&items, 4).is_empty());
        assert!(p.slice(&items, usize::MAX).is_empty());
        assert!(p.slice::<u32>(&[], 1).is_empty());
    }

    #[test]
    fn test_pages_reconstruct_sequence_for_any_size() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..=30 {
            let p = paginator(size);
            let rebuilt: Vec<u32> = (1..=p.total_pages(items.len()))
                .flat_map(|page| p.slice(&items, page).iter().copied())
                .collect();
            assert_eq!(rebuilt, items, "page size {size}");
        }
    }

    #[test]
    fn test_page_reports_totals() {
        let items: Vec<u32> = (1..=10).collect();
        let page = paginator(8).page(&items, 2);
        assert_eq!(page.items, vec![9, 10]);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 8);
        assert_eq!(page.total_items, 10);
        assert_eq!(page.total_pages, 2);
    }
}
