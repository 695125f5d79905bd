/// Document identifier. `0` is reserved, see [`END_OF_LIST`](super::constants::END_OF_LIST).
pub type DocId = u32;
/// Number of documents, used for term frequencies and the collection size.
pub type DocCount = u32;
pub type Weight = f64;
pub type DocLength = f64;
