//! Pairing engine module
//!
//! Decides which adjacent pages of a chapter merge into one. The scan is a
//! fixed-stride sweep over (0,1), (2,3), (4,5), … — it never slides by one,
//! even when a pair is rejected. Tail fragments are assumed to be the second
//! page of a same-parity pair; a merge or a skip never shifts the alignment
//! of later pairs.

use crate::sequence::Page;

/// One entry of a pairing plan, covering either two merged source pages or a
/// single untouched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePlan {
    /// Merge pages `leading` and `trailing` into one stitched page
    Stitch { leading: usize, trailing: usize },
    /// Pass the page through unchanged
    Keep(usize),
}

/// Ordered partition of a chapter's page indices into merges and singles.
///
/// Every source index appears exactly once, in reading order, so a page
/// consumed by one merge is never reconsidered as the start of another.
#[derive(Debug, Clone, Default)]
pub struct PairingPlan {
    pub entries: Vec<PagePlan>,
}

impl PairingPlan {
    /// Number of merges in the plan
    pub fn merges(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, PagePlan::Stitch { .. }))
            .count()
    }

    /// Number of pages the plan produces
    pub fn output_len(&self) -> usize {
        self.entries.len()
    }
}

/// Geometric eligibility rule: the trailing page is a short tail fragment
/// appended after a full-height page. Widths must match exactly; no fuzz
/// tolerance for off-by-one scan artifacts.
pub fn is_tail_pair(leading: &Page, trailing: &Page) -> bool {
    leading.width == trailing.width && leading.height > trailing.height
}

/// Scan the ordered page sequence and plan the merges.
///
/// Only even indices are considered as a pair's leading element. A rejected
/// pair leaves both pages untouched; the final page of an odd-length chapter
/// is always untouched.
pub fn plan_pairs(pages: &[Page]) -> PairingPlan {
    let mut entries = Vec::with_capacity(pages.len());

    let mut i = 0;
    while i < pages.len() {
        if i + 1 < pages.len() && is_tail_pair(&pages[i], &pages[i + 1]) {
            entries.push(PagePlan::Stitch {
                leading: i,
                trailing: i + 1,
            });
        } else {
            entries.push(PagePlan::Keep(i));
            if i + 1 < pages.len() {
                entries.push(PagePlan::Keep(i + 1));
            }
        }
        i += 2;
    }

    PairingPlan { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn page(index: usize, width: u32, height: u32) -> Page {
        Page {
            index,
            path: PathBuf::from(format!("{:02}.jpg", index)),
            width,
            height,
            extension: "jpg".to_string(),
        }
    }

    fn pages(dims: &[(u32, u32)]) -> Vec<Page> {
        dims.iter()
            .enumerate()
            .map(|(i, &(w, h))| page(i, w, h))
            .collect()
    }

    #[test]
    fn test_eligibility_rule_exhaustive() {
        // (leading w/h, trailing w/h, expected)
        let cases = [
            ((100, 150), (100, 50), true),   // tail shorter, widths equal
            ((100, 150), (100, 150), false), // equal heights must not merge
            ((100, 150), (100, 200), false), // taller trailing must not merge
            ((100, 150), (101, 50), false),  // differing widths must not merge
            ((101, 150), (100, 50), false),
            ((100, 150), (99, 50), false), // off-by-one width is not tolerated
            ((100, 1), (100, 0), true),
        ];
        for ((lw, lh), (tw, th), expected) in cases {
            let leading = page(0, lw, lh);
            let trailing = page(1, tw, th);
            assert_eq!(
                is_tail_pair(&leading, &trailing),
                expected,
                "leading {}x{}, trailing {}x{}",
                lw,
                lh,
                tw,
                th
            );
        }
    }

    #[test]
    fn test_plan_merges_eligible_pair() {
        let plan = plan_pairs(&pages(&[(100, 150), (100, 50)]));
        assert_eq!(
            plan.entries,
            vec![PagePlan::Stitch {
                leading: 0,
                trailing: 1
            }]
        );
        assert_eq!(plan.merges(), 1);
        assert_eq!(plan.output_len(), 1);
    }

    #[test]
    fn test_rejected_pair_keeps_both_pages() {
        let plan = plan_pairs(&pages(&[(100, 150), (100, 150)]));
        assert_eq!(plan.entries, vec![PagePlan::Keep(0), PagePlan::Keep(1)]);
        assert_eq!(plan.merges(), 0);
    }

    #[test]
    fn test_scan_is_fixed_stride_not_sliding() {
        // (P0,P1) ineligible, (P2,P3) ineligible, but (P1,P2) WOULD be
        // eligible. A sliding window would merge the middle pair; the fixed
        // stride must not.
        let plan = plan_pairs(&pages(&[
            (100, 150),
            (100, 150), // P1: same size as P0 -> rejected
            (100, 50),  // P1 x P2 would satisfy the rule
            (100, 50),  // P3: same size as P2 -> rejected
        ]));
        assert_eq!(plan.merges(), 0);
        assert_eq!(
            plan.entries,
            vec![
                PagePlan::Keep(0),
                PagePlan::Keep(1),
                PagePlan::Keep(2),
                PagePlan::Keep(3),
            ]
        );
    }

    #[test]
    fn test_reference_four_page_scenario() {
        // page0+page1 merge; page2/page3 stay (equal heights).
        let plan = plan_pairs(&pages(&[
            (100, 150),
            (100, 50),
            (100, 150),
            (100, 150),
        ]));
        assert_eq!(
            plan.entries,
            vec![
                PagePlan::Stitch {
                    leading: 0,
                    trailing: 1
                },
                PagePlan::Keep(2),
                PagePlan::Keep(3),
            ]
        );
        assert_eq!(plan.output_len(), 3);
    }

    #[test]
    fn test_odd_length_leaves_final_page_untouched() {
        // Final page would be an eligible tail for page 3, but page 4 has no
        // partner in the fixed stride.
        let plan = plan_pairs(&pages(&[
            (100, 150),
            (100, 50),
            (100, 150),
            (100, 150),
            (100, 10),
        ]));
        assert_eq!(plan.merges(), 1);
        assert_eq!(plan.entries.last(), Some(&PagePlan::Keep(4)));
    }

    #[test]
    fn test_single_page_chapter() {
        let plan = plan_pairs(&pages(&[(100, 150)]));
        assert_eq!(plan.entries, vec![PagePlan::Keep(0)]);
    }

    #[test]
    fn test_empty_sequence() {
        let plan = plan_pairs(&[]);
        assert!(plan.entries.is_empty());
        assert_eq!(plan.merges(), 0);
        assert_eq!(plan.output_len(), 0);
    }

    #[test]
    fn test_output_len_matches_input_minus_merges() {
        let dims = [
            (100, 150),
            (100, 50),
            (100, 150),
            (100, 70),
            (200, 90),
            (100, 90),
            (100, 150),
        ];
        let plan = plan_pairs(&pages(&dims));
        assert_eq!(plan.output_len(), dims.len() - plan.merges());
    }

    #[test]
    fn test_every_index_appears_exactly_once() {
        let dims = [(100, 150), (100, 50), (100, 60), (100, 60), (100, 10)];
        let plan = plan_pairs(&pages(&dims));

        let mut seen = vec![0usize; dims.len()];
        for entry in &plan.entries {
            match *entry {
                PagePlan::Stitch { leading, trailing } => {
                    seen[leading] += 1;
                    seen[trailing] += 1;
                }
                PagePlan::Keep(i) => seen[i] += 1,
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }
}
