use log::trace;

use crate::common::constants::{END_OF_LIST, NO_THRESHOLD};
use crate::common::errors::PostListError;
use crate::common::types::{DocCount, DocId, DocLength, Weight};

use super::branch::BranchPostList;
use super::estimate::{and_not_term_freq_est, and_not_term_freq_min, clamp_estimate};
use super::traits::{Advance, BoxedPostList, MaxWeightSignal, PostList};

/// Returns the postings of the left postlist which are not in the right one.
///
/// The right side never contributes weight, so it is advanced without a
/// threshold. Once it runs dry the bare left child is handed back.
pub struct AndNotPostList {
    branch: BranchPostList,
    lhead: DocId,
    rhead: DocId,
    db_size: DocCount,
}

impl AndNotPostList {
    pub fn new(left: BoxedPostList, right: BoxedPostList, signal: MaxWeightSignal, db_size: DocCount) -> Self {
        Self {
            branch: BranchPostList::new(left, right, signal),
            lhead: END_OF_LIST,
            rhead: END_OF_LIST,
            db_size,
        }
    }

    /// The left child has just moved, walk it forward until it sits on a
    /// docid the right child doesn't have.
    fn advance_to_next_match(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        loop {
            if self.branch.left.at_end() {
                self.lhead = END_OF_LIST;
                return Ok(Advance::Stay);
            }
            self.lhead = self.branch.left.docid();
            if self.rhead < self.lhead {
                self.branch.skip_right(self.lhead, NO_THRESHOLD)?;
                if self.branch.right.at_end() {
                    trace!("{} -> left, right side ran dry", self.description());
                    return Ok(Advance::Replace(self.branch.hand_back_left(w_min)?));
                }
                self.rhead = self.branch.right.docid();
            }
            if self.rhead != self.lhead {
                return Ok(Advance::Stay);
            }
            self.branch.next_left(w_min)?;
        }
    }
}

impl PostList for AndNotPostList {
    fn term_freq_min(&self) -> DocCount {
        and_not_term_freq_min(self.branch.left.term_freq_min(), self.branch.right.term_freq_max())
    }

    fn term_freq_max(&self) -> DocCount {
        self.branch.left.term_freq_max()
    }

    fn term_freq_est(&self) -> DocCount {
        // Estimate assuming independence: P(l and not r) = P(l) . (1 - P(r))
        let est = and_not_term_freq_est(
            self.branch.left.term_freq_est(),
            self.branch.right.term_freq_est(),
            self.db_size,
        );
        clamp_estimate(est, self.term_freq_min(), self.term_freq_max())
    }

    fn max_weight(&self) -> Weight {
        self.branch.left.max_weight()
    }

    fn recalc_max_weight(&mut self) -> Weight {
        // keeps the right subtree's cached bounds fresh for a later replacement.
        self.branch.right.recalc_max_weight();
        self.branch.left.recalc_max_weight()
    }

    fn docid(&self) -> DocId {
        assert_ne!(self.lhead, END_OF_LIST, "docid of {} read while at end", self.description());
        self.lhead
    }

    fn weight(&self) -> Weight {
        self.branch.left.weight()
    }

    fn doc_length(&self) -> DocLength {
        self.branch.left.doc_length()
    }

    fn at_end(&self) -> bool {
        self.lhead == END_OF_LIST && self.branch.left.at_end()
    }

    fn next(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        self.branch.next_left(w_min)?;
        self.advance_to_next_match(w_min)
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError> {
        if did <= self.lhead {
            return Ok(Advance::Stay);
        }
        self.branch.skip_left(did, w_min)?;
        self.advance_to_next_match(w_min)
    }

    fn description(&self) -> String {
        self.branch.describe("AndNot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::postlist::test::{drain, drain_docids, failing, mock_docids, term};

    fn and_not(left: BoxedPostList, right: BoxedPostList) -> BoxedPostList {
        let mut postlist = AndNotPostList::new(left, right, MaxWeightSignal::new(), 1000);
        postlist.recalc_max_weight();
        Box::new(postlist)
    }

    #[test]
    fn test_difference() {
        let mut postlist = and_not(
            term("l", &[(1, 1.0), (3, 2.0), (5, 1.0), (7, 0.5), (9, 1.0)]),
            term("r", &[(3, 4.0), (4, 4.0), (5, 4.0), (9, 4.0), (10, 4.0)]),
        );
        // the right side never adds weight.
        assert_eq!(drain(&mut postlist, NO_THRESHOLD), vec![(1, 1.0), (7, 0.5)]);
    }

    #[test]
    fn test_hands_back_left_when_right_runs_dry() {
        let mut postlist = and_not(term("l", &[(1, 1.0), (2, 1.0), (6, 1.0)]), term("r", &[(2, 1.0)]));
        let _ = postlist.next(NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 1);
        let Advance::Replace(left) = postlist.next(NO_THRESHOLD).unwrap() else {
            panic!("expected the left child as replacement");
        };
        assert_eq!(left.description(), "l");
        assert_eq!(left.docid(), 6);
    }

    #[test]
    fn test_empty_right_side() {
        let mut postlist = and_not(term("l", &[(4, 1.0), (8, 1.0)]), term("r", &[]));
        assert_eq!(drain(&mut postlist, NO_THRESHOLD), vec![(4, 1.0), (8, 1.0)]);
    }

    #[test]
    fn test_skip_to() {
        let mut postlist = and_not(
            term("l", &[(2, 1.0), (4, 1.0), (6, 1.0), (8, 1.0)]),
            term("r", &[(4, 1.0), (6, 1.0), (10, 1.0)]),
        );
        let _ = postlist.skip_to(3, NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 8);
        let _ = postlist.skip_to(5, NO_THRESHOLD).unwrap();
        assert_eq!(postlist.docid(), 8);
        let _ = postlist.skip_to(9, NO_THRESHOLD).unwrap();
        assert!(postlist.at_end());
    }

    #[test]
    fn test_max_weight_ignores_right() {
        let mut postlist = AndNotPostList::new(
            term("l", &[(1, 2.0), (2, 1.0)]),
            term("r", &[(5, 9.0)]),
            MaxWeightSignal::new(),
            10,
        );
        assert_eq!(postlist.recalc_max_weight(), 2.0);
        assert_eq!(postlist.max_weight(), 2.0);
    }

    #[test]
    fn test_term_freq() {
        let postlist = and_not(term("l", &mock_docids(100, 1)), term("r", &mock_docids(500, 2)));
        assert_eq!(postlist.term_freq_min(), 0);
        assert_eq!(postlist.term_freq_max(), 100);
        assert_eq!(postlist.term_freq_est(), 50);
        assert_eq!(postlist.description(), "(l AndNot r)");

        let postlist = and_not(term("l", &mock_docids(10, 1)), term("r", &mock_docids(4, 1)));
        assert_eq!(postlist.term_freq_min(), 6);
    }

    #[test]
    fn test_matches_set_difference() {
        let left = mock_docids(90, 2);
        let right = mock_docids(50, 3);
        let expected: Vec<DocId> = left
            .iter()
            .map(|&(docid, _)| docid)
            .filter(|docid| !right.iter().any(|&(other, _)| other == *docid))
            .collect();

        let mut postlist = and_not(term("l", &left), term("r", &right));
        assert_eq!(drain_docids(&mut postlist, NO_THRESHOLD), expected);
    }

    #[test]
    fn test_failure_on_right_side_propagates() {
        let mut postlist = and_not(term("l", &[(1, 1.0), (5, 1.0)]), failing("r", 2));
        let res = postlist.next(NO_THRESHOLD);
        assert!(matches!(res, Err(PostListError::StorageError { .. })));
    }
}
