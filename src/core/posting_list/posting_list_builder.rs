use itertools::Itertools;
use log::{error, warn};

use crate::common::constants::END_OF_LIST;
use crate::common::errors::PostingListError;
use crate::common::types::{DocId, DocLength, Weight};

use super::element::{PostingElement, DEFAULT_MAX_NEXT_WEIGHT};
use super::PostingList;

#[derive(Debug, Default)]
pub struct PostingListBuilder {
    elements: Vec<PostingElement>,
    finally_sort: bool,
}

// Builder pattern
impl PostingListBuilder {
    pub fn new() -> Self {
        Self { elements: Vec::new(), finally_sort: false }
    }

    /// Sort the elements by docid before building, for callers adding out of order.
    pub fn with_finally_sort(mut self, sort: bool) -> Self {
        self.finally_sort = sort;
        self
    }
}

impl PostingListBuilder {
    pub fn add(&mut self, docid: DocId, weight: Weight, doc_length: DocLength) {
        self.elements.push(PostingElement::new(docid, weight, doc_length));
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn build(mut self) -> Result<PostingList, PostingListError> {
        if self.finally_sort {
            self.elements.sort_unstable_by_key(|e| e.docid);
        } else if self.elements.iter().tuple_windows().any(|(a, b)| a.docid > b.docid) {
            warn!("Posting elements were added out of docid order, sorting them before build.");
            self.elements.sort_unstable_by_key(|e| e.docid);
        }

        if let Some(element) = self.elements.first() {
            if element.docid == END_OF_LIST {
                error!("Docid {} can't be stored in a posting list.", END_OF_LIST);
                return Err(PostingListError::ReservedDocId(element.docid));
            }
        }
        if let Some((_, duplicated)) = self.elements.iter().tuple_windows().find(|(a, b)| a.docid == b.docid) {
            error!("Duplicated docid {} in posting list.", duplicated.docid);
            return Err(PostingListError::DuplicatedDocId(duplicated.docid));
        }
        if let Some(element) = self.elements.iter().find(|e| !e.weight.is_finite() || e.weight < 0.0) {
            return Err(PostingListError::InvalidWeight { docid: element.docid, weight: element.weight });
        }

        // propagate max_next_weight from back to front.
        let mut max_next_weight: Weight = DEFAULT_MAX_NEXT_WEIGHT;
        for element in self.elements.iter_mut().rev() {
            element.max_next_weight = max_next_weight;
            max_next_weight = max_next_weight.max(element.weight);
        }

        Ok(PostingList { elements: self.elements })
    }
}
