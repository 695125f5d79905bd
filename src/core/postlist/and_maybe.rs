use log::trace;

use crate::common::constants::END_OF_LIST;
use crate::common::errors::PostListError;
use crate::common::types::{DocCount, DocId, DocLength, Weight};

use super::and::AndPostList;
use super::branch::{same_doc_length, BranchPostList};
use super::traits::{skip_to_handling_prune, Advance, BoxedPostList, MaxWeightSignal, PostList};

/// Returns the postings of the left postlist, with the weight of the right
/// postlist added whenever it matches too.
///
/// Turns into an [`AndPostList`] once the left side alone can't reach
/// `w_min`, and into the bare left child once the right side runs dry.
pub struct AndMaybePostList {
    branch: BranchPostList,
    lhead: DocId,
    rhead: DocId,
    lmax: Weight,
    rmax: Weight,
    db_size: DocCount,
}

impl AndMaybePostList {
    pub fn new(left: BoxedPostList, right: BoxedPostList, signal: MaxWeightSignal, db_size: DocCount) -> Self {
        Self::with_heads(left, right, signal, db_size, END_OF_LIST, END_OF_LIST)
    }

    /// Builds the node around children which are already positioned on
    /// `lhead` / `rhead`, used when an `OrPostList` decays.
    pub(super) fn with_heads(
        left: BoxedPostList,
        right: BoxedPostList,
        signal: MaxWeightSignal,
        db_size: DocCount,
        lhead: DocId,
        rhead: DocId,
    ) -> Self {
        let (lmax, rmax) = (left.max_weight(), right.max_weight());
        Self {
            branch: BranchPostList::new(left, right, signal),
            lhead,
            rhead,
            lmax,
            rmax,
            db_size,
        }
    }

    /// Brings the right child up to `lhead` without moving the left child.
    pub(super) fn sync_rhs(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        self.branch.skip_right(self.lhead, w_min - self.lmax)?;
        if self.branch.right.at_end() {
            trace!("{} -> left, right side ran dry", self.description());
            return Ok(Advance::Replace(self.branch.hand_back_left(w_min)?));
        }
        self.rhead = self.branch.right.docid();
        Ok(Advance::Stay)
    }

    fn process_next_or_skip_to(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        if self.branch.left.at_end() {
            self.lhead = END_OF_LIST;
            return Ok(Advance::Stay);
        }
        self.lhead = self.branch.left.docid();
        if self.lhead <= self.rhead {
            return Ok(Advance::Stay);
        }
        self.sync_rhs(w_min)
    }

    /// The left side alone can't reach `w_min` any more, only documents in
    /// both children are left.
    fn decay_to_and(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError> {
        trace!("{} -> And, w_min {} above left max weight {}", self.description(), w_min, self.lmax);
        let signal = self.branch.signal.clone();
        let (left, right) = (self.branch.take_left(), self.branch.take_right());
        let mut replacement: BoxedPostList =
            Box::new(AndPostList::new(left, right, signal.clone(), self.db_size, true));
        skip_to_handling_prune(&mut replacement, did, w_min, &signal)?;
        Ok(Advance::Replace(replacement))
    }
}

impl PostList for AndMaybePostList {
    fn term_freq_min(&self) -> DocCount {
        self.branch.left.term_freq_min()
    }

    fn term_freq_max(&self) -> DocCount {
        self.branch.left.term_freq_max()
    }

    fn term_freq_est(&self) -> DocCount {
        self.branch.left.term_freq_est()
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
        assert_ne!(self.lhead, END_OF_LIST, "docid of {} read while at end", self.description());
        self.lhead
    }

    fn weight(&self) -> Weight {
        if self.lhead == self.rhead {
            self.branch.left.weight() + self.branch.right.weight()
        } else {
            self.branch.left.weight()
        }
    }

    fn doc_length(&self) -> DocLength {
        let doc_length = self.branch.left.doc_length();
        debug_assert!(self.lhead != self.rhead || same_doc_length(doc_length, self.branch.right.doc_length()));
        doc_length
    }

    fn at_end(&self) -> bool {
        self.lhead == END_OF_LIST
    }

    fn next(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        if w_min > self.lmax {
            // the AND must move past lhead, and can't match before rhead.
            let did = if self.rhead > self.lhead { self.rhead } else { self.lhead + 1 };
            return self.decay_to_and(did, w_min);
        }
        self.branch.next_left(w_min - self.rmax)?;
        self.process_next_or_skip_to(w_min)
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError> {
        if w_min > self.lmax {
            let did = did.max(self.lhead).max(self.rhead);
            return self.decay_to_and(did, w_min);
        }
        if did <= self.lhead {
            if self.rhead < self.lhead {
                return self.sync_rhs(w_min);
            }
            return Ok(Advance::Stay);
        }
        self.branch.skip_left(did, w_min - self.rmax)?;
        self.process_next_or_skip_to(w_min)
    }

    fn description(&self) -> String {
        self.branch.describe("AndMaybe")
    }
}
