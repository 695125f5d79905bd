use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::common::constants::NO_THRESHOLD;
use crate::common::types::{DocId, Weight};

/// A matched document and its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub docid: DocId,
    pub weight: Weight,
}

impl Eq for ScoredDoc {}

/// Higher weight ranks higher, on equal weight the lower docid ranks higher.
impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.weight)
            .cmp(&OrderedFloat(other.weight))
            .then_with(|| other.docid.cmp(&self.docid))
    }
}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `top` best ranked documents seen so far.
#[derive(Debug, Default)]
pub struct TopK {
    top: usize,
    heap: BinaryHeap<Reverse<ScoredDoc>>,
}

impl TopK {
    pub fn new(top: usize) -> Self {
        Self {
            top,
            heap: BinaryHeap::with_capacity(top.saturating_add(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.top > 0 && self.heap.len() >= self.top
    }

    /// Weight a new document has to exceed to get in, `NO_THRESHOLD` until full.
    pub fn threshold(&self) -> Weight {
        match (self.is_full(), self.heap.peek()) {
            (true, Some(Reverse(worst))) => worst.weight,
            _ => NO_THRESHOLD,
        }
    }

    /// Returns whether the document made it into the top.
    pub fn push(&mut self, doc: ScoredDoc) -> bool {
        if self.top == 0 {
            return false;
        }
        if self.is_full() {
            match self.heap.peek() {
                Some(Reverse(worst)) if doc > *worst => {}
                _ => return false,
            }
            self.heap.pop();
        }
        self.heap.push(Reverse(doc));
        true
    }

    /// Best ranked first.
    pub fn into_sorted_vec(self) -> Vec<ScoredDoc> {
        // ascending order of Reverse is descending order of the docs.
        self.heap.into_sorted_vec().into_iter().map(|Reverse(doc)| doc).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(docid: DocId, weight: Weight) -> ScoredDoc {
        ScoredDoc { docid, weight }
    }

    #[test]
    fn test_ordering() {
        assert!(doc(5, 2.0) > doc(1, 1.0));
        assert!(doc(1, 1.0) > doc(2, 1.0));
        assert_eq!(doc(3, 1.0).cmp(&doc(3, 1.0)), Ordering::Equal);
    }

    #[test]
    fn test_keeps_best() {
        let mut top = TopK::new(3);
        assert_eq!(top.threshold(), NO_THRESHOLD);
        for (docid, weight) in [(1, 0.5), (2, 3.0), (3, 1.0), (4, 2.0), (5, 0.1)] {
            top.push(doc(docid, weight));
        }
        assert!(top.is_full());
        assert_eq!(top.threshold(), 1.0);
        assert_eq!(top.into_sorted_vec(), vec![doc(2, 3.0), doc(4, 2.0), doc(3, 1.0)]);
    }

    #[test]
    fn test_ties_keep_lower_docid() {
        let mut top = TopK::new(1);
        assert!(top.push(doc(3, 1.0)));
        assert!(!top.push(doc(7, 1.0)));
        assert!(top.push(doc(2, 1.0)));
        assert_eq!(top.into_sorted_vec(), vec![doc(2, 1.0)]);
    }

    #[test]
    fn test_zero_sized() {
        let mut top = TopK::new(0);
        assert!(!top.push(doc(1, 1.0)));
        assert!(top.is_empty());
        assert_eq!(top.threshold(), NO_THRESHOLD);
    }
}
