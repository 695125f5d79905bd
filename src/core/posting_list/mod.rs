mod element;
mod posting_list;
mod posting_list_builder;

pub use element::{PostingElement, DEFAULT_MAX_NEXT_WEIGHT};
pub use posting_list::PostingList;
pub use posting_list_builder::PostingListBuilder;

#[cfg(test)]
pub(crate) mod test {
    use crate::common::types::{DocId, DocLength, Weight};

    use super::{PostingList, PostingListBuilder};

    /// Document length used by every test posting of `docid`, so branches agree.
    pub(crate) fn doc_length_of(docid: DocId) -> DocLength {
        (docid % 97 + 1) as DocLength * 8.0
    }

    pub(crate) fn build_posting(elements: &[(DocId, Weight)]) -> PostingList {
        let mut builder = PostingListBuilder::new();
        for &(docid, weight) in elements {
            builder.add(docid, weight, doc_length_of(docid));
        }
        builder.build().expect("error build posting")
    }
}
