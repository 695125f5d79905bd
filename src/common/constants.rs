use super::types::{DocId, Weight};

/// Docid reported by a postlist which has no current posting.
pub const END_OF_LIST: DocId = 0;

/// `w_min` used by boolean matching, no posting is ever below it.
pub const NO_THRESHOLD: Weight = Weight::NEG_INFINITY;

pub const MATCH_CONFIG_FILE: &str = "match_config.json";

pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Logging target shared by every module of this crate.
pub const LOG_TARGET: &str = "postlist_core";
