use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::{log_enabled, trace, Level};

use crate::common::errors::PostListError;
use crate::common::types::{DocCount, DocId, DocLength, Weight};

pub type BoxedPostList = Box<dyn PostList>;

/// Outcome of `next` / `skip_to`.
#[must_use]
pub enum Advance {
    /// Keep using the node which was advanced.
    Stay,
    /// Drop the advanced node and use this one in its slot instead.
    ///
    /// The replacement is already positioned where the old node would be.
    Replace(BoxedPostList),
}

impl Advance {
    pub fn is_replace(&self) -> bool {
        matches!(self, Advance::Replace(_))
    }
}

impl fmt::Debug for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advance::Stay => write!(f, "Stay"),
            Advance::Replace(postlist) => write!(f, "Replace({})", postlist.description()),
        }
    }
}

/// A lazily advancing, docid ordered sequence of `(docid, weight)` postings.
///
/// Every leaf and every combinator of a query tree implements this. The
/// driver calls `next` / `skip_to` until `at_end()`, reading `docid` and
/// `weight` in between. In ranked mode `recalc_max_weight` must be called on
/// the root before the first advance and whenever the threshold changes or a
/// [`MaxWeightSignal`] is raised, otherwise the cached bounds may be stale.
///
/// `docid`, `weight` and `doc_length` panic when the postlist is at end.
pub trait PostList {
    /// Lower bound on the number of postings this postlist can produce.
    fn term_freq_min(&self) -> DocCount;

    /// Upper bound on the number of postings this postlist can produce.
    fn term_freq_max(&self) -> DocCount;

    /// Estimated number of postings, always within `[term_freq_min, term_freq_max]`.
    fn term_freq_est(&self) -> DocCount;

    /// Upper bound on the weights still to come, as of the last recalculation.
    fn max_weight(&self) -> Weight;

    /// Recalculates children first and returns the refreshed `max_weight`.
    fn recalc_max_weight(&mut self) -> Weight;

    fn docid(&self) -> DocId;

    /// Only meaningful in ranked mode.
    fn weight(&self) -> Weight;

    fn doc_length(&self) -> DocLength;

    fn at_end(&self) -> bool;

    /// Moves to the next posting which may reach `w_min`.
    fn next(&mut self, w_min: Weight) -> Result<Advance, PostListError>;

    /// Moves to the first posting with docid `>= did` which may reach `w_min`.
    /// Does nothing when already positioned at or past `did`.
    fn skip_to(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError>;

    fn description(&self) -> String;
}

/// Tells the driver that bounds in the tree are stale.
///
/// Raised whenever a node swaps one of its children for a replacement. The
/// driver owns the original handle and every combinator holds a clone.
#[derive(Debug, Clone, Default)]
pub struct MaxWeightSignal {
    pending: Rc<Cell<bool>>,
}

impl MaxWeightSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.pending.set(true);
    }

    pub fn is_raised(&self) -> bool {
        self.pending.get()
    }

    /// Returns whether the signal was raised and lowers it.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

/// Installs a replacement handed back by the postlist in `slot`.
pub fn handle_prune(slot: &mut BoxedPostList, advance: Advance, signal: &MaxWeightSignal) {
    if let Advance::Replace(replacement) = advance {
        if log_enabled!(Level::Trace) {
            trace!("replacing {} with {}", slot.description(), replacement.description());
        }
        *slot = replacement;
        signal.raise();
    }
}

pub fn next_handling_prune(
    slot: &mut BoxedPostList,
    w_min: Weight,
    signal: &MaxWeightSignal,
) -> Result<(), PostListError> {
    let advance = slot.next(w_min)?;
    handle_prune(slot, advance, signal);
    Ok(())
}

pub fn skip_to_handling_prune(
    slot: &mut BoxedPostList,
    did: DocId,
    w_min: Weight,
    signal: &MaxWeightSignal,
) -> Result<(), PostListError> {
    let advance = slot.skip_to(did, w_min)?;
    handle_prune(slot, advance, signal);
    Ok(())
}
