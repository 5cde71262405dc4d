//! Page-number pagination for the post listings.

use serde::Deserialize;

/// The `?page=N` query parameter, parsed leniently: absent, junk, or
/// zero all land on page 1. A page past the end of the data renders as
/// an empty page rather than an error.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1)
    }
}

/// Row offset for a 1-based page number.
pub fn offset(number: u32, per_page: u32) -> u64 {
    u64::from(number - 1) * u64::from(per_page)
}

/// One page of an ordered result set, plus enough bookkeeping to draw
/// the pagination links.
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        self.total.div_ceil(per_page) as u32
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    /// Page numbers to link to, with `None` marking an elided gap:
    /// the first and last page plus a window around the current one.
    pub fn links(&self) -> Vec<Option<u32>> {
        let total = self.total_pages();
        let mut out = Vec::new();
        let mut in_gap = false;

        for n in 1..=total {
            let edge = n == 1 || n == total;
            let near_current = n.abs_diff(self.number) <= 2;
            if edge || near_current {
                out.push(Some(n));
                in_gap = false;
            } else if !in_gap {
                out.push(None);
                in_gap = true;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, per_page: u32, total: u64) -> Page<u32> {
        Page {
            items: Vec::new(),
            number,
            per_page,
            total,
        }
    }

    #[test]
    fn query_parses_leniently() {
        let q = |raw: Option<&str>| PageQuery {
            page: raw.map(str::to_string),
        };

        assert_eq!(q(None).number(), 1);
        assert_eq!(q(Some("3")).number(), 3);
        assert_eq!(q(Some("0")).number(), 1);
        assert_eq!(q(Some("-2")).number(), 1);
        assert_eq!(q(Some("banana")).number(), 1);
    }

    #[test]
    fn offsets_are_zero_based() {
        assert_eq!(offset(1, 2), 0);
        assert_eq!(offset(2, 2), 2);
        assert_eq!(offset(5, 2), 8);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(page(1, 2, 0).total_pages(), 0);
        assert_eq!(page(1, 2, 1).total_pages(), 1);
        assert_eq!(page(1, 2, 2).total_pages(), 1);
        assert_eq!(page(1, 2, 3).total_pages(), 2);
    }

    #[test]
    fn prev_next_track_position() {
        let first = page(1, 2, 6);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = page(3, 2, 6);
        assert!(last.has_prev());
        assert!(!last.has_next());

        // a page past the end has nothing further
        assert!(!page(9, 2, 6).has_next());
    }

    #[test]
    fn links_elide_far_pages() {
        let links = page(10, 2, 40).links();
        assert_eq!(
            links,
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20),
            ]
        );
    }

    #[test]
    fn links_small_sets_have_no_gaps() {
        assert_eq!(
            page(2, 2, 6).links(),
            vec![Some(1), Some(2), Some(3)]
        );
        assert!(page(1, 2, 0).links().is_empty());
    }
}
