use crate::common::types::{DocCount, DocId, Weight};

use super::element::PostingElement;

/// Postings of one term, sorted by docid, with `max_next_weight` propagated.
///
/// Built by [`PostingListBuilder`](super::PostingListBuilder).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostingList {
    pub(super) elements: Vec<PostingElement>,
}

impl std::fmt::Display for PostingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Posting{:?}", self.elements.iter().map(|e| (e.docid, e.weight)).collect::<Vec<_>>())
    }
}

impl PostingList {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn term_freq(&self) -> DocCount {
        self.elements.len() as DocCount
    }

    pub fn get(&self, idx: usize) -> Option<&PostingElement> {
        self.elements.get(idx)
    }

    pub fn elements(&self) -> &[PostingElement] {
        &self.elements
    }

    /// Max weight of the whole list, `0` for an empty list.
    pub fn max_weight(&self) -> Weight {
        self.elements.first().map(|e| e.remaining_max_weight()).unwrap_or(0.0)
    }

    /// Position of the first element at or after `from` whose docid is `>= docid`.
    pub fn lower_bound(&self, from: usize, docid: DocId) -> usize {
        if from >= self.elements.len() {
            return self.elements.len();
        }
        from + self.elements[from..].partition_point(|e| e.docid < docid)
    }

    /// Position of the first element at or after `from` whose weight is `>= w_min`.
    ///
    /// Uses `max_next_weight` to stop scanning as soon as no later element can
    /// reach `w_min`.
    pub fn first_reaching(&self, from: usize, w_min: Weight) -> usize {
        let mut cursor = from;
        while let Some(element) = self.elements.get(cursor) {
            if element.weight >= w_min {
                return cursor;
            }
            if element.max_next_weight < w_min {
                return self.elements.len();
            }
            cursor += 1;
        }
        cursor
    }
}
