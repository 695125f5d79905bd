use log::trace;

use crate::common::constants::END_OF_LIST;
use crate::common::errors::PostListError;
use crate::common::types::{DocCount, DocId, DocLength, Weight};

use super::and::AndPostList;
use super::and_maybe::AndMaybePostList;
use super::branch::{same_doc_length, BranchPostList};
use super::estimate::{clamp_estimate, or_term_freq_est, or_term_freq_max, or_term_freq_min};
use super::traits::{handle_prune, next_handling_prune, skip_to_handling_prune, Advance, BoxedPostList, MaxWeightSignal, PostList};

/// A postlist comprising two postlists ORed together.
///
/// Returns a posting if it is in either sub-postlist, weighted by the sum of
/// the sub-postings present. Once `w_min` exceeds the smaller of the two
/// bounds the node hands back a cheaper equivalent: an [`AndPostList`] when
/// neither side can reach `w_min` alone, otherwise an [`AndMaybePostList`]
/// driven by the side which still can. When one side runs dry the other one
/// is handed back, stepped past its current docid if that can't reach
/// `w_min` alone.
///
/// Children are advanced with `w_min` less the other side's bound, so a
/// docid found in one child only may still fall short of `w_min`. The same
/// filtering applies to `next` and `skip_to`, which therefore land on the
/// same docids.
pub struct OrPostList {
    branch: BranchPostList,
    lhead: DocId,
    rhead: DocId,
    lmax: Weight,
    rmax: Weight,
    minmax: Weight,
    db_size: DocCount,
}

impl OrPostList {
    pub fn new(left: BoxedPostList, right: BoxedPostList, signal: MaxWeightSignal, db_size: DocCount) -> Self {
        let (lmax, rmax) = (left.max_weight(), right.max_weight());
        Self {
            branch: BranchPostList::new(left, right, signal),
            lhead: END_OF_LIST,
            rhead: END_OF_LIST,
            lmax,
            rmax,
            minmax: lmax.min(rmax),
            db_size,
        }
    }

    /// Replaces this node by an AND or AND MAYBE of its children.
    ///
    /// `did` is `None` for `next`, the replacement then has to move past the
    /// current docid.
    fn decay(&mut self, did: Option<DocId>, w_min: Weight) -> Result<Advance, PostListError> {
        let signal = self.branch.signal.clone();
        let (lhead, rhead) = (self.lhead, self.rhead);
        let (left, right) = (self.branch.take_left(), self.branch.take_right());

        if w_min > self.lmax && w_min > self.rmax {
            trace!("Or -> And, w_min {} above both max weights {} and {}", w_min, self.lmax, self.rmax);
            let mut replacement: BoxedPostList =
                Box::new(AndPostList::new(left, right, signal.clone(), self.db_size, true));
            let did = match did {
                Some(did) => did.max(lhead).max(rhead),
                None if lhead == rhead => lhead + 1,
                None => lhead.max(rhead),
            };
            skip_to_handling_prune(&mut replacement, did, w_min, &signal)?;
            return Ok(Advance::Replace(replacement));
        }

        // the side which can still reach w_min on its own drives the AND MAYBE.
        let (driver, driver_head, other, other_head) = match w_min > self.lmax {
            true => {
                trace!("Or -> AndMaybe, right side drives");
                (right, rhead, left, lhead)
            }
            false => {
                trace!("Or -> AndMaybe, left side drives");
                (left, lhead, right, rhead)
            }
        };
        let mut and_maybe =
            AndMaybePostList::with_heads(driver, other, signal.clone(), self.db_size, driver_head, other_head);
        let mut replacement: BoxedPostList = match did {
            Some(did) => {
                let advance = and_maybe.skip_to(did, w_min)?;
                let mut replacement: BoxedPostList = Box::new(and_maybe);
                handle_prune(&mut replacement, advance, &signal);
                replacement
            }
            // driver_head is ahead of the current docid and hasn't been returned yet.
            None if driver_head > other_head => {
                let advance = and_maybe.sync_rhs(w_min)?;
                let mut replacement: BoxedPostList = Box::new(and_maybe);
                handle_prune(&mut replacement, advance, &signal);
                replacement
            }
            None => Box::new(and_maybe),
        };
        if did.is_none() && driver_head <= other_head {
            next_handling_prune(&mut replacement, w_min, &signal)?;
        }
        Ok(Advance::Replace(replacement))
    }
}

impl PostList for OrPostList {
    fn term_freq_min(&self) -> DocCount {
        or_term_freq_min(self.branch.left.term_freq_min(), self.branch.right.term_freq_min())
    }

    fn term_freq_max(&self) -> DocCount {
        or_term_freq_max(self.branch.left.term_freq_max(), self.branch.right.term_freq_max(), self.db_size)
    }

    fn term_freq_est(&self) -> DocCount {
        // Estimate assuming independence: P(l or r) = P(l) + P(r) - P(l) . P(r)
        let est = or_term_freq_est(
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
        self.minmax = self.lmax.min(self.rmax);
        self.max_weight()
    }

    fn docid(&self) -> DocId {
        assert!(!self.at_end(), "docid of {} read while at end", self.description());
        self.lhead.min(self.rhead)
    }

    fn weight(&self) -> Weight {
        match self.lhead.cmp(&self.rhead) {
            std::cmp::Ordering::Less => self.branch.left.weight(),
            std::cmp::Ordering::Greater => self.branch.right.weight(),
            std::cmp::Ordering::Equal => self.branch.left.weight() + self.branch.right.weight(),
        }
    }

    fn doc_length(&self) -> DocLength {
        match self.lhead.cmp(&self.rhead) {
            std::cmp::Ordering::Less => self.branch.left.doc_length(),
            std::cmp::Ordering::Greater => self.branch.right.doc_length(),
            std::cmp::Ordering::Equal => {
                let doc_length = self.branch.left.doc_length();
                debug_assert!(same_doc_length(doc_length, self.branch.right.doc_length()));
                doc_length
            }
        }
    }

    /// An OR hands back its survivor once a side runs dry, so this only
    /// holds after both children moved out.
    fn at_end(&self) -> bool {
        self.branch.left.at_end() && self.branch.right.at_end()
    }

    fn next(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        if w_min > self.minmax {
            return self.decay(None, w_min);
        }

        let mut ldry = false;
        let mut rnext = false;
        if self.lhead <= self.rhead {
            // equal heads only before the first next or on a shared docid.
            if self.lhead == self.rhead {
                rnext = true;
            }
            self.branch.next_left(w_min - self.rmax)?;
            ldry = self.branch.left.at_end();
        } else {
            rnext = true;
        }

        if rnext {
            self.branch.next_right(w_min - self.lmax)?;
            if self.branch.right.at_end() {
                trace!("{} -> left, right side ran dry", self.description());
                return Ok(Advance::Replace(self.branch.hand_back_left(w_min)?));
            }
            self.rhead = self.branch.right.docid();
        }

        if !ldry {
            self.lhead = self.branch.left.docid();
            return Ok(Advance::Stay);
        }
        trace!("{} -> right, left side ran dry", self.description());
        Ok(Advance::Replace(self.branch.hand_back_right(w_min)?))
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError> {
        if w_min > self.minmax {
            return self.decay(Some(did), w_min);
        }

        let mut ldry = false;
        if self.lhead < did {
            self.branch.skip_left(did, w_min - self.rmax)?;
            ldry = self.branch.left.at_end();
        }

        if self.rhead < did {
            self.branch.skip_right(did, w_min - self.lmax)?;
            if self.branch.right.at_end() {
                trace!("{} -> left, right side ran dry", self.description());
                return Ok(Advance::Replace(self.branch.hand_back_left(w_min)?));
            }
            self.rhead = self.branch.right.docid();
        }

        if !ldry {
            self.lhead = self.branch.left.docid();
            return Ok(Advance::Stay);
        }
        trace!("{} -> right, left side ran dry", self.description());
        Ok(Advance::Replace(self.branch.hand_back_right(w_min)?))
    }

    fn description(&self) -> String {
        self.branch.describe("Or")
    }
}
