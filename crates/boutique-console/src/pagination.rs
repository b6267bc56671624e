/// A single entry of the pager line: a selectable page number or a gap
/// standing in for a run of hidden pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEntry {
    Page(u64),
    Gap,
}

impl std::fmt::Display for PageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageEntry::Page(n) => write!(f, "{}", n),
            PageEntry::Gap => write!(f, "..."),
        }
    }
}

/// Computes the compact pager line for `current` out of `total` pages.
///
/// Up to five pages are listed in full. Beyond that the line keeps the first
/// and last page and a 3-wide window around `current`, clamped so it never
/// leaves `2..=total-1`, with a gap wherever hidden pages remain. A single
/// page (or none) yields an empty line and the caller hides the pager.
pub fn page_window(current: u64, total: u64) -> Vec<PageEntry> {
    if total <= 1 {
        return Vec::new();
    }

    if total <= 5 {
        return (1..=total).map(PageEntry::Page).collect();
    }

    let start = current.saturating_sub(1).clamp(2, total - 3);
    let end = start + 2;

    let mut entries = Vec::with_capacity(8);
    entries.push(PageEntry::Page(1));
    if start > 2 {
        entries.push(PageEntry::Gap);
    }
    entries.extend((start..=end).map(PageEntry::Page));
    if end < total - 1 {
        entries.push(PageEntry::Gap);
    }
    entries.push(PageEntry::Page(total));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageEntry::{Gap, Page};

    #[test]
    fn single_page_is_suppressed() {
        assert!(page_window(1, 1).is_empty());
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn short_ranges_are_listed_in_full() {
        assert_eq!(page_window(1, 2), vec![Page(1), Page(2)]);
        assert_eq!(
            page_window(4, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn window_near_the_start_keeps_page_two() {
        assert_eq!(
            page_window(3, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(10)]
        );
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(10)]
        );
    }

    #[test]
    fn window_near_the_end_keeps_the_tail() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Gap, Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            page_window(8, 10),
            vec![Page(1), Gap, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn window_in_the_middle_has_gaps_on_both_sides() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
    }

    #[test]
    fn window_never_duplicates_boundary_pages() {
        for total in 6..=20 {
            for current in 1..=total {
                let entries = page_window(current, total);
                let pages: Vec<u64> = entries
                    .iter()
                    .filter_map(|e| match e {
                        Page(n) => Some(*n),
                        Gap => None,
                    })
                    .collect();
                let mut deduped = pages.clone();
                deduped.dedup();
                assert_eq!(pages, deduped, "current={} total={}", current, total);
                assert!(pages.contains(&current), "current={} total={}", current, total);
                assert_eq!(pages.first(), Some(&1));
                assert_eq!(pages.last(), Some(&total));
            }
        }
    }
}
