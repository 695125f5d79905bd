use crate::common::types::{DocId, DocLength, Weight};

pub const DEFAULT_MAX_NEXT_WEIGHT: Weight = Weight::NEG_INFINITY;

#[derive(Debug, Clone, PartialEq)]
pub struct PostingElement {
    pub docid: DocId,
    /// Weight of the term in this document
    pub weight: Weight,
    /// Length of the document, identical in every posting list for `docid`.
    pub doc_length: DocLength,
    /// Max weight of the next elements in the posting list.
    pub max_next_weight: Weight,
}

impl PostingElement {
    pub fn new(docid: DocId, weight: Weight, doc_length: DocLength) -> Self {
        Self {
            docid,
            weight,
            doc_length,
            max_next_weight: DEFAULT_MAX_NEXT_WEIGHT,
        }
    }

    /// Upper bound for this element and everything after it.
    #[inline]
    pub fn remaining_max_weight(&self) -> Weight {
        self.weight.max(self.max_next_weight)
    }
}
