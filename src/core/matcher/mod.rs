mod match_config;
mod matcher;
mod top_k;

pub use match_config::{MatchConfig, MatchMode};
pub use matcher::{MatchResult, Matcher};
pub use top_k::{ScoredDoc, TopK};
