//! Page-number windowing for the pager control.
//!
//! Given the current page and the total page count, picks which page numbers
//! to show and where to collapse runs into an ellipsis, so the pager stays a
//! fixed width no matter how deep into the catalog the user is.

/// One slot in the rendered pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEntry {
    Page(u32),
    Ellipsis,
}

/// Compute the pager window for `current` out of `total` pages.
///
/// `sibling_count` pages are kept on each side of the current page and
/// `boundary_count` pages (>= 1) at each end. Windows containing at most
/// `sibling_count*2 + 3 + boundary_count*2` pages fit without truncation and
/// are returned whole. An ellipsis always hides at least one page; a gap of
/// zero or one pages is rendered as the pages themselves.
///
/// A catalog with zero or one pages yields an empty window and the caller
/// suppresses the pager entirely.
pub fn compute_window(
    current: u32,
    total: u32,
    sibling_count: u32,
    boundary_count: u32,
) -> Vec<PagerEntry> {
    if total <= 1 {
        return Vec::new();
    }

    let span = sibling_count * 2 + 3 + boundary_count * 2;
    if total <= span {
        return (1..=total).map(PagerEntry::Page).collect();
    }

    let left_sibling = current.saturating_sub(sibling_count).max(boundary_count);
    let right_sibling = (current + sibling_count).min(total - boundary_count);

    let left_dots = left_sibling > boundary_count + 2;
    let right_dots = right_sibling < total - boundary_count - 1;

    match (left_dots, right_dots) {
        // Current page near the start: solid run on the left, one gap before
        // the right boundary.
        (false, true) => {
            let left_count = 3 + 2 * sibling_count + boundary_count;
            let mut window: Vec<PagerEntry> = (1..=left_count).map(PagerEntry::Page).collect();
            window.push(PagerEntry::Ellipsis);
            window.extend((total - boundary_count + 1..=total).map(PagerEntry::Page));
            window
        }
        // Near the end: mirror image.
        (true, false) => {
            let right_count = 3 + 2 * sibling_count + boundary_count;
            let mut window: Vec<PagerEntry> = (1..=boundary_count).map(PagerEntry::Page).collect();
            window.push(PagerEntry::Ellipsis);
            window.extend((total - right_count + 1..=total).map(PagerEntry::Page));
            window
        }
        // Somewhere in the middle: boundaries at both ends, siblings around
        // the current page, a gap on each side.
        (true, true) => {
            let mut window: Vec<PagerEntry> = (1..=boundary_count).map(PagerEntry::Page).collect();
            window.push(PagerEntry::Ellipsis);
            window.extend((left_sibling..=right_sibling).map(PagerEntry::Page));
            window.push(PagerEntry::Ellipsis);
            window.extend((total - boundary_count + 1..=total).map(PagerEntry::Page));
            window
        }
        // Unreachable once total > span, but the function stays total:
        // concatenate boundaries and siblings without any markers.
        (false, false) => {
            let mut pages: Vec<u32> = (1..=boundary_count)
                .chain(left_sibling..=right_sibling)
                .chain(total - boundary_count + 1..=total)
                .collect();
            pages.sort_unstable();
            pages.dedup();
            pages.into_iter().map(PagerEntry::Page).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PagerEntry::{Ellipsis, Page};

    fn pages(window: &[PagerEntry]) -> Vec<u32> {
        window
            .iter()
            .filter_map(|entry| match entry {
                Page(p) => Some(*p),
                Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn one_page_or_fewer_suppresses_the_pager() {
        assert!(compute_window(1, 0, 1, 1).is_empty());
        assert!(compute_window(1, 1, 1, 1).is_empty());
    }

    #[test]
    fn totals_within_span_come_back_whole() {
        // span = 1*2 + 3 + 1*2 = 7
        for total in 2..=7 {
            let window = compute_window(1, total, 1, 1);
            assert_eq!(pages(&window), (1..=total).collect::<Vec<_>>());
            assert!(!window.contains(&Ellipsis), "total={}", total);
        }
    }

    #[test]
    fn deep_middle_page_gets_dots_on_both_sides() {
        let window = compute_window(50, 500, 1, 1);
        assert_eq!(
            window,
            vec![
                Page(1),
                Ellipsis,
                Page(49),
                Page(50),
                Page(51),
                Ellipsis,
                Page(500),
            ]
        );
    }

    #[test]
    fn page_near_start_gets_right_dots_only() {
        let window = compute_window(1, 10, 1, 1);
        assert_eq!(
            window,
            vec![
                Page(1),
                Page(2),
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Ellipsis,
                Page(10),
            ]
        );
    }

    #[test]
    fn page_near_end_gets_left_dots_only() {
        let window = compute_window(498, 500, 1, 1);
        assert_eq!(
            window,
            vec![
                Page(1),
                Ellipsis,
                Page(495),
                Page(496),
                Page(497),
                Page(498),
                Page(499),
                Page(500),
            ]
        );
    }

    #[test]
    fn wider_boundaries_are_respected() {
        let window = compute_window(20, 40, 2, 2);
        assert_eq!(
            window,
            vec![
                Page(1),
                Page(2),
                Ellipsis,
                Page(18),
                Page(19),
                Page(20),
                Page(21),
                Page(22),
                Ellipsis,
                Page(39),
                Page(40),
            ]
        );
    }

    #[test]
    fn an_ellipsis_always_hides_at_least_one_page() {
        for total in 8..=60 {
            for current in 1..=total {
                let window = compute_window(current, total, 1, 1);
                for pair in window.windows(3) {
                    if let [Page(a), Ellipsis, Page(b)] = pair {
                        assert!(b - a >= 2, "current={} total={}: {}..{}", current, total, a, b);
                    }
                }
                for pair in window.windows(2) {
                    assert!(
                        !matches!(pair, [Ellipsis, Ellipsis]),
                        "adjacent ellipses at current={} total={}",
                        current,
                        total
                    );
                }
                // Boundary pages survive truncation.
                assert_eq!(window.first(), Some(&Page(1)));
                assert_eq!(window.last(), Some(&Page(total)));
            }
        }
    }
}
