use log::trace;

use crate::common::constants::END_OF_LIST;
use crate::common::errors::PostListError;
use crate::common::types::{DocCount, DocId, DocLength, Weight};

use super::branch::BranchPostList;
use super::estimate::{and_term_freq_est, and_term_freq_max, and_term_freq_min, clamp_estimate};
use super::traits::{Advance, BoxedPostList, MaxWeightSignal, PostList};

/// A postlist comprising two postlists ANDed together.
///
/// Returns a posting if and only if it is in both sub-postlists. The weight
/// of a posting is the sum of the weights of the sub-postings.
///
/// Children are advanced with a threshold lowered by the other side's bound:
/// a posting of the left child needs at least `w_min - rmax` to possibly reach
/// `w_min` together with the right child. `lmax` / `rmax` are only refreshed
/// by [`recalc_max_weight`](PostList::recalc_max_weight).
pub struct AndPostList {
    branch: BranchPostList,
    /// Current docid, `END_OF_LIST` before the first advance and once exhausted.
    head: DocId,
    /// Set for good once either child runs dry or `w_min` is out of reach.
    exhausted: bool,
    lmax: Weight,
    rmax: Weight,
    db_size: DocCount,
}

impl AndPostList {
    /// `replacement` is set when the node replaces another one mid query,
    /// the children's current bounds are then taken over so no full
    /// recalculation is needed. Otherwise both bounds start at `0` until
    /// the first `recalc_max_weight`.
    pub fn new(
        left: BoxedPostList,
        right: BoxedPostList,
        signal: MaxWeightSignal,
        db_size: DocCount,
        replacement: bool,
    ) -> Self {
        let (lmax, rmax) = match replacement {
            true => (left.max_weight(), right.max_weight()),
            false => (0.0, 0.0),
        };
        Self {
            branch: BranchPostList::new(left, right, signal),
            head: END_OF_LIST,
            exhausted: false,
            lmax,
            rmax,
            db_size,
        }
    }

    /// Both children have just been advanced, move the one behind until they agree.
    fn process_next_or_skip_to(&mut self, w_min: Weight) -> Result<(), PostListError> {
        self.head = END_OF_LIST;
        if self.branch.right.at_end() {
            self.exhaust();
            return Ok(());
        }

        let mut lhead = self.branch.left.docid();
        let mut rhead = self.branch.right.docid();
        while lhead != rhead {
            if lhead < rhead {
                self.branch.skip_left(rhead, w_min - self.rmax)?;
                if self.branch.left.at_end() {
                    self.exhaust();
                    return Ok(());
                }
                lhead = self.branch.left.docid();
            } else {
                self.branch.skip_right(lhead, w_min - self.lmax)?;
                if self.branch.right.at_end() {
                    self.exhaust();
                    return Ok(());
                }
                rhead = self.branch.right.docid();
            }
        }
        debug_assert!(lhead != END_OF_LIST);
        self.head = lhead;
        Ok(())
    }

    /// Nothing left can reach `w_min`, stop without touching the children.
    fn unreachable(&mut self, w_min: Weight) -> bool {
        if w_min > self.lmax + self.rmax {
            trace!("{} can't reach w_min {}, max weight is {}", self.description(), w_min, self.lmax + self.rmax);
            self.exhaust();
            return true;
        }
        false
    }

    fn exhaust(&mut self) {
        self.head = END_OF_LIST;
        self.exhausted = true;
    }

    fn assert_positioned(&self) {
        assert_ne!(self.head, END_OF_LIST, "{} read while at end or before its first advance", self.description());
    }
}

impl PostList for AndPostList {
    fn term_freq_min(&self) -> DocCount {
        and_term_freq_min()
    }

    fn term_freq_max(&self) -> DocCount {
        and_term_freq_max(self.branch.left.term_freq_max(), self.branch.right.term_freq_max())
    }

    fn term_freq_est(&self) -> DocCount {
        // Estimate assuming independence: P(l and r) = P(l) . P(r)
        let est = and_term_freq_est(
            self.branch.left.term_freq_est(),
            self.branch.right.term_freq_est(),
            self.db_size,
        );
        clamp_estimate(est, self.term_freq_min(), self.term_freq_max())
    }

    fn max_weight(&self) -> Weight {
        self.lmax + self.rmax
    }

    fn recalc_max_weight(&mut self) -> Weight {
        self.lmax = self.branch.left.recalc_max_weight();
        self.rmax = self.branch.right.recalc_max_weight();
        self.max_weight()
    }

    fn docid(&self) -> DocId {
        self.assert_positioned();
        self.head
    }

    fn weight(&self) -> Weight {
        self.assert_positioned();
        debug_assert_eq!(self.branch.left.docid(), self.head);
        debug_assert_eq!(self.branch.right.docid(), self.head);
        self.branch.left.weight() + self.branch.right.weight()
    }

    fn doc_length(&self) -> DocLength {
        self.assert_positioned();
        self.branch.doc_length()
    }

    fn at_end(&self) -> bool {
        self.exhausted
    }

    fn next(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        if self.exhausted || self.unreachable(w_min) {
            return Ok(Advance::Stay);
        }
        let previous = self.head;
        self.branch.next_left(w_min - self.rmax)?;
        if self.branch.left.at_end() {
            self.exhaust();
            return Ok(Advance::Stay);
        }
        self.branch.next_right(w_min - self.lmax)?;
        self.process_next_or_skip_to(w_min)?;
        debug_assert!(self.at_end() || self.head > previous, "docids must strictly increase");
        Ok(Advance::Stay)
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError> {
        if self.exhausted || did <= self.head {
            return Ok(Advance::Stay);
        }
        if self.unreachable(w_min) {
            return Ok(Advance::Stay);
        }
        self.branch.skip_left(did, w_min - self.rmax)?;
        if self.branch.left.at_end() {
            self.exhaust();
            return Ok(Advance::Stay);
        }
        self.branch.skip_right(did, w_min - self.lmax)?;
        self.process_next_or_skip_to(w_min)?;
        debug_assert!(self.at_end() || self.head >= did);
        Ok(Advance::Stay)
    }

    fn description(&self) -> String {
        self.branch.describe("And")
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::common::constants::NO_THRESHOLD;
    use crate::core::postlist::test::{collect, collect_with_weights, failing, mock_docids, term};

    fn and(left: BoxedPostList, right: BoxedPostList, db_size: DocCount) -> AndPostList {
        AndPostList::new(left, right, MaxWeightSignal::new(), db_size, false)
    }

    #[test]
    fn test_intersection() {
        let mut postlist = and(
            term("l", &[(1, 1.0), (3, 1.0), (5, 1.0), (7, 1.0), (9, 1.0)]),
            term("r", &[(3, 1.0), (4, 1.0), (5, 1.0), (9, 1.0), (10, 1.0)]),
            100,
        );
        assert_eq!(collect(&mut postlist, NO_THRESHOLD), vec![3, 5, 9]);
        assert!(postlist.at_end());
    }

    #[test]
    fn test_weight_is_sum_of_children() {
        let mut postlist = and(term("l", &[(2, 0.5), (5, 2.0)]), term("r", &[(5, 1.5), (6, 1.0)]), 100);
        postlist.recalc_max_weight();
        assert_eq!(collect_with_weights(&mut postlist, NO_THRESHOLD), vec![(5, 3.5)]);
    }

    #[test]
    fn test_disjoint_and_empty_children() {
        let mut postlist = and(term("l", &[(1, 1.0), (3, 1.0)]), term("r", &[(2, 1.0), (4, 1.0)]), 10);
        assert!(collect(&mut postlist, NO_THRESHOLD).is_empty());

        let mut postlist = and(term("l", &[]), term("r", &[(2, 1.0), (4, 1.0)]), 10);
        assert!(collect(&mut postlist, NO_THRESHOLD).is_empty());

        let mut postlist = and(term("l", &[(2, 1.0)]), term("r", &[]), 10);
        assert!(collect(&mut postlist, NO_THRESHOLD).is_empty());
    }

    #[test]
    fn test_skip_to() {
        let mut postlist = and(
            term("l", &[(1, 1.0), (3, 1.0), (5, 1.0), (7, 1.0), (9, 1.0)]),
            term("r", &[(3, 1.0), (4, 1.0), (5, 1.0), (9, 1.0), (10, 1.0)]),
            100,
        );
        let _ = postlist.skip_to(4, NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 5);
        // not past the current docid, so nothing moves.
        let _ = postlist.skip_to(5, NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 5);
        let _ = postlist.skip_to(6, NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 9);
        let _ = postlist.skip_to(10, NO_THRESHOLD).unwrap();
        assert!(postlist.at_end());
    }

    #[test]
    fn test_term_freq() {
        let postlist = and(term("l", &mock_docids(100, 1)), term("r", &mock_docids(50, 2)), 1000);
        assert_eq!(postlist.term_freq_min(), 0);
        assert_eq!(postlist.term_freq_max(), 50);
        assert_eq!(postlist.term_freq_est(), 5);

        // the independence estimate is clamped into the bounds.
        let postlist = and(term("l", &mock_docids(100, 1)), term("r", &mock_docids(50, 2)), 10);
        assert_eq!(postlist.term_freq_est(), 50);
    }

    #[test]
    fn test_description() {
        let inner = and(term("a", &[]), term("b", &[]), 10);
        let postlist = and(Box::new(inner), term("c", &[]), 10);
        assert_eq!(postlist.description(), "((a And b) And c)");
    }

    #[test]
    fn test_max_weight() {
        let mut postlist = and(term("l", &[(1, 4.0), (2, 1.0)]), term("r", &[(1, 2.0), (2, 0.5)]), 10);
        assert_eq!(postlist.max_weight(), 0.0);
        assert_eq!(postlist.recalc_max_weight(), 6.0);

        let mut previous = postlist.max_weight();
        loop {
            let _ = postlist.next(NO_THRESHOLD).unwrap();
            if postlist.at_end() {
                break;
            }
            let current = postlist.recalc_max_weight();
            assert!(current <= previous);
            previous = current;
        }
        assert_eq!(previous, 1.5);

        let replacement = AndPostList::new(term("l", &[(1, 4.0)]), term("r", &[(1, 2.0)]), MaxWeightSignal::new(), 10, true);
        assert_eq!(replacement.max_weight(), 6.0);
    }

    #[test]
    fn test_weight_pruning() {
        // only docid 4 can reach 5.0 once bounds are known.
        let mut postlist = and(
            term("l", &[(1, 1.0), (2, 1.0), (4, 3.0), (6, 0.5)]),
            term("r", &[(1, 1.0), (2, 1.0), (4, 2.5), (6, 2.5)]),
            10,
        );
        postlist.recalc_max_weight();
        assert_eq!(collect(&mut postlist, 5.0), vec![4]);

        // a threshold above the max weight ends the postlist immediately.
        let mut postlist = and(term("l", &[(1, 1.0)]), term("r", &[(1, 1.0)]), 10);
        postlist.recalc_max_weight();
        let _ = postlist.next(2.5).unwrap();
        assert!(postlist.at_end());
    }

    #[test]
    fn test_failure_propagates() {
        let mut postlist = and(term("l", &[(1, 1.0), (2, 1.0)]), failing("r", 1), 10);
        let _ = postlist.next(NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 1);
        let res = postlist.next(NO_THRESHOLD);
        assert!(matches!(res, Err(PostListError::StorageError { .. })));
    }

    #[test]
    fn test_drop_mid_iteration() {
        let mut postlist = and(term("l", &mock_docids(100, 1)), term("r", &mock_docids(100, 3)), 1000);
        let _ = postlist.next(NO_THRESHOLD).unwrap();
        let _ = postlist.next(NO_THRESHOLD).unwrap();
        assert!(!postlist.at_end());
        drop(postlist);
    }

    #[test]
    fn test_skip_to_agrees_with_next() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let left = mock_docids(rng.gen_range(0..200), rng.gen_range(1..4));
            let right = mock_docids(rng.gen_range(0..200), rng.gen_range(1..4));
            let expected = collect(&mut and(term("l", &left), term("r", &right), 1000), NO_THRESHOLD);

            let target: DocId = rng.gen_range(1..400);
            let mut postlist = and(term("l", &left), term("r", &right), 1000);
            let _ = postlist.skip_to(target, NO_THRESHOLD).unwrap();
            match expected.iter().find(|&&docid| docid >= target) {
                Some(&docid) => assert_eq!(postlist.docid(), docid),
                None => assert!(postlist.at_end()),
            }
        }
    }

    #[test]
    fn test_skip_to_with_threshold_agrees_with_next() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let left = mock_docids(rng.gen_range(1..200), rng.gen_range(1..4));
            let right = mock_docids(rng.gen_range(1..200), rng.gen_range(1..4));
            let w_min: Weight = rng.gen_range(0.0..7.0);

            let mut reference = and(term("l", &left), term("r", &right), 1000);
            reference.recalc_max_weight();
            let expected = collect(&mut reference, w_min);

            let target: DocId = rng.gen_range(1..400);
            let mut postlist = and(term("l", &left), term("r", &right), 1000);
            postlist.recalc_max_weight();
            let _ = postlist.skip_to(target, w_min).unwrap();
            match expected.iter().find(|&&docid| docid >= target) {
                Some(&docid) => assert_eq!(postlist.docid(), docid),
                None => assert!(postlist.at_end()),
            }
        }
    }

    #[test]
    fn test_mixed_next_and_skip_to_strictly_increase() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let left = mock_docids(rng.gen_range(1..200), rng.gen_range(1..3));
            let right = mock_docids(rng.gen_range(1..200), rng.gen_range(1..3));
            let w_min: Weight = if rng.gen_bool(0.5) { NO_THRESHOLD } else { rng.gen_range(0.0..7.0) };
            let mut postlist = and(term("l", &left), term("r", &right), 1000);
            postlist.recalc_max_weight();

            let mut previous: DocId = 0;
            while !postlist.at_end() {
                if rng.gen_bool(0.5) {
                    let _ = postlist.next(w_min).unwrap();
                    if !postlist.at_end() {
                        assert!(postlist.docid() > previous);
                        previous = postlist.docid();
                    }
                } else {
                    // targets at or behind the current docid must leave it in place.
                    let target = (previous + rng.gen_range(0..10)).max(1);
                    let _ = postlist.skip_to(target, w_min).unwrap();
                    if !postlist.at_end() {
                        assert!(postlist.docid() >= target.max(previous));
                        if target <= previous {
                            assert_eq!(postlist.docid(), previous);
                        }
                        previous = postlist.docid();
                    }
                }
            }
        }
    }

    /// Ends the AND early, because no doc can reach a threshold of 100.0.
    fn exhausted_by_threshold() -> AndPostList {
        let mut postlist = and(term("l", &[(1, 1.0), (2, 1.0)]), term("r", &[(1, 2.0), (2, 1.0)]), 10);
        postlist.recalc_max_weight();
        let _ = postlist.next(NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 1);
        let _ = postlist.next(100.0).unwrap();
        assert!(postlist.at_end());
        postlist
    }

    #[test]
    #[should_panic(expected = "read while at end")]
    fn test_weight_at_end_panics() {
        let postlist = exhausted_by_threshold();
        let _ = postlist.weight();
    }

    #[test]
    #[should_panic(expected = "read while at end")]
    fn test_doc_length_at_end_panics() {
        let postlist = exhausted_by_threshold();
        let _ = postlist.doc_length();
    }

    #[test]
    fn test_end_is_permanent() {
        let mut postlist = exhausted_by_threshold();
        let _ = postlist.skip_to(1, NO_THRESHOLD).unwrap();
        assert!(postlist.at_end());
        let _ = postlist.next(NO_THRESHOLD).unwrap();
        assert!(postlist.at_end());

        let mut postlist = and(term("l", &[(1, 1.0)]), term("r", &[(1, 1.0), (2, 1.0)]), 10);
        assert!(!postlist.at_end());
        assert_eq!(collect(&mut postlist, NO_THRESHOLD), vec![1]);
        let _ = postlist.skip_to(1, NO_THRESHOLD).unwrap();
        assert!(postlist.at_end());
    }
}
