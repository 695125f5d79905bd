use std::mem;

use crate::common::errors::PostListError;
use crate::common::types::{DocId, DocLength, Weight};

use super::leaf::EmptyPostList;
use super::traits::{next_handling_prune, skip_to_handling_prune, BoxedPostList, MaxWeightSignal, PostList};

/// The two children of a binary combinator.
///
/// Owns both children exclusively, dropping it drops the whole subtree.
/// Advancing a child through the helpers here installs any replacement the
/// child hands back and raises the shared [`MaxWeightSignal`].
pub struct BranchPostList {
    pub(super) left: BoxedPostList,
    pub(super) right: BoxedPostList,
    pub(super) signal: MaxWeightSignal,
}

impl BranchPostList {
    pub fn new(left: BoxedPostList, right: BoxedPostList, signal: MaxWeightSignal) -> Self {
        Self { left, right, signal }
    }

    pub fn left(&self) -> &dyn PostList {
        self.left.as_ref()
    }

    pub fn right(&self) -> &dyn PostList {
        self.right.as_ref()
    }

    /// Document length of the current document, read from the left branch.
    ///
    /// Both branches must be positioned on the same docid, debug builds check
    /// that they report the same length.
    pub fn doc_length(&self) -> DocLength {
        let doc_length = self.left.doc_length();
        debug_assert!(
            same_doc_length(doc_length, self.right.doc_length()),
            "branches disagree on doc length at docid {}: {} != {}",
            self.left.docid(),
            doc_length,
            self.right.doc_length()
        );
        doc_length
    }

    pub fn describe(&self, operator: &str) -> String {
        format!("({} {} {})", self.left.description(), operator, self.right.description())
    }

    pub fn next_left(&mut self, w_min: Weight) -> Result<(), PostListError> {
        next_handling_prune(&mut self.left, w_min, &self.signal)
    }

    pub fn next_right(&mut self, w_min: Weight) -> Result<(), PostListError> {
        next_handling_prune(&mut self.right, w_min, &self.signal)
    }

    pub fn skip_left(&mut self, did: DocId, w_min: Weight) -> Result<(), PostListError> {
        skip_to_handling_prune(&mut self.left, did, w_min, &self.signal)
    }

    pub fn skip_right(&mut self, did: DocId, w_min: Weight) -> Result<(), PostListError> {
        skip_to_handling_prune(&mut self.right, did, w_min, &self.signal)
    }

    /// Moves the left child out, leaving an [`EmptyPostList`] in its slot.
    pub fn take_left(&mut self) -> BoxedPostList {
        mem::replace(&mut self.left, Box::new(EmptyPostList::new()))
    }

    /// Moves the right child out, leaving an [`EmptyPostList`] in its slot.
    pub fn take_right(&mut self) -> BoxedPostList {
        mem::replace(&mut self.right, Box::new(EmptyPostList::new()))
    }

    /// Moves the left child out to stand in for the whole branch once the
    /// right side ran dry.
    pub fn hand_back_left(&mut self, w_min: Weight) -> Result<BoxedPostList, PostListError> {
        let left = self.take_left();
        self.hand_back(left, w_min)
    }

    /// Moves the right child out to stand in for the whole branch once the
    /// left side ran dry.
    pub fn hand_back_right(&mut self, w_min: Weight) -> Result<BoxedPostList, PostListError> {
        let right = self.take_right();
        self.hand_back(right, w_min)
    }

    /// The survivor was advanced with the threshold less the other side's
    /// bound. Alone it has to reach `w_min` itself, so a current docid which
    /// falls short is stepped over.
    fn hand_back(&self, mut survivor: BoxedPostList, w_min: Weight) -> Result<BoxedPostList, PostListError> {
        if !survivor.at_end() && survivor.weight() < w_min {
            next_handling_prune(&mut survivor, w_min, &self.signal)?;
        }
        Ok(survivor)
    }
}

pub(super) fn same_doc_length(a: DocLength, b: DocLength) -> bool {
    (a - b).abs() <= DocLength::EPSILON * a.abs().max(b.abs()).max(1.0)
}
