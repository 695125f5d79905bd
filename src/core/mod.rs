pub mod matcher;
pub mod posting_list;
pub mod postlist;

pub use matcher::{MatchConfig, MatchMode, MatchResult, Matcher, ScoredDoc, TopK};
pub use posting_list::{PostingElement, PostingList, PostingListBuilder, DEFAULT_MAX_NEXT_WEIGHT};
pub use postlist::*;
