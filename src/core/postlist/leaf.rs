use std::sync::Arc;

use crate::common::errors::PostListError;
use crate::common::types::{DocCount, DocId, DocLength, Weight};
use crate::core::posting_list::{PostingElement, PostingList};

use super::traits::{Advance, PostList};

/// Leaf postlist walking the postings of one term.
///
/// Postings below the `w_min` passed to `next` / `skip_to` are stepped over,
/// the `max_next_weight` of each element lets it give up early when nothing
/// further down the list can reach the threshold.
#[derive(Debug, Clone)]
pub struct TermPostList {
    term: String,
    posting: Arc<PostingList>,
    cursor: usize,
    started: bool,
    max_weight: Weight,
}

impl TermPostList {
    pub fn new(term: impl Into<String>, posting: Arc<PostingList>) -> Self {
        let max_weight = posting.max_weight();
        Self {
            term: term.into(),
            posting,
            cursor: 0,
            started: false,
            max_weight,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    fn current(&self) -> &PostingElement {
        assert!(self.started, "`{}` is read before its first next/skip_to", self.term);
        match self.posting.get(self.cursor) {
            Some(element) => element,
            None => panic!("`{}` is read after reaching its end", self.term),
        }
    }
}

impl PostList for TermPostList {
    fn term_freq_min(&self) -> DocCount {
        self.posting.term_freq()
    }

    fn term_freq_max(&self) -> DocCount {
        self.posting.term_freq()
    }

    fn term_freq_est(&self) -> DocCount {
        self.posting.term_freq()
    }

    fn max_weight(&self) -> Weight {
        self.max_weight
    }

    fn recalc_max_weight(&mut self) -> Weight {
        self.max_weight = match self.posting.get(self.cursor) {
            Some(element) => element.remaining_max_weight(),
            None => 0.0,
        };
        self.max_weight
    }

    fn docid(&self) -> DocId {
        self.current().docid
    }

    fn weight(&self) -> Weight {
        self.current().weight
    }

    fn doc_length(&self) -> DocLength {
        self.current().doc_length
    }

    fn at_end(&self) -> bool {
        self.started && self.cursor >= self.posting.len()
    }

    fn next(&mut self, w_min: Weight) -> Result<Advance, PostListError> {
        if self.started {
            self.cursor += 1;
        } else {
            self.started = true;
        }
        self.cursor = self.posting.first_reaching(self.cursor, w_min);
        Ok(Advance::Stay)
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> Result<Advance, PostListError> {
        if self.started && (self.at_end() || self.current().docid >= did) {
            return Ok(Advance::Stay);
        }
        self.started = true;
        let cursor = self.posting.lower_bound(self.cursor, did);
        self.cursor = self.posting.first_reaching(cursor, w_min);
        Ok(Advance::Stay)
    }

    fn description(&self) -> String {
        self.term.clone()
    }
}

/// Postlist without any posting, left behind in a slot whose child moved away.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPostList;

impl EmptyPostList {
    pub fn new() -> Self {
        EmptyPostList
    }
}

impl PostList for EmptyPostList {
    fn term_freq_min(&self) -> DocCount {
        0
    }

    fn term_freq_max(&self) -> DocCount {
        0
    }

    fn term_freq_est(&self) -> DocCount {
        0
    }

    fn max_weight(&self) -> Weight {
        0.0
    }

    fn recalc_max_weight(&mut self) -> Weight {
        0.0
    }

    fn docid(&self) -> DocId {
        panic!("EmptyPostList has no current posting")
    }

    fn weight(&self) -> Weight {
        panic!("EmptyPostList has no current posting")
    }

    fn doc_length(&self) -> DocLength {
        panic!("EmptyPostList has no current posting")
    }

    fn at_end(&self) -> bool {
        true
    }

    fn next(&mut self, _w_min: Weight) -> Result<Advance, PostListError> {
        Ok(Advance::Stay)
    }

    fn skip_to(&mut self, _did: DocId, _w_min: Weight) -> Result<Advance, PostListError> {
        Ok(Advance::Stay)
    }

    fn description(&self) -> String {
        "<empty>".to_string()
    }
}
