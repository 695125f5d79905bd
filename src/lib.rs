//! Lazily evaluated, document-ordered postlists and the boolean / weighted
//! combinators built on top of them.
//!
//! A query is evaluated by a tree of [`PostList`] nodes. The ranking driver
//! (see [`Matcher`]) owns the root and pulls postings with `next` / `skip_to`,
//! installing any replacement node a call hands back.

mod common;
mod core;

pub use crate::common::errors::{ConfigError, FileOperationError, MatchError, PostListError, PostingListError};
pub use crate::common::logger::LoggerConfig;
pub use crate::common::types::{DocCount, DocId, DocLength, Weight};
pub use crate::common::constants::{END_OF_LIST, NO_THRESHOLD};
pub use crate::core::*;
