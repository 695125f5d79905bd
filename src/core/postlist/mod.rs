mod and;
mod and_maybe;
mod and_not;
mod branch;
pub mod estimate;
mod leaf;
mod or;
mod traits;

pub use and::AndPostList;
pub use and_maybe::AndMaybePostList;
pub use and_not::AndNotPostList;
pub use branch::BranchPostList;
pub use leaf::{EmptyPostList, TermPostList};
pub use or::OrPostList;
pub use traits::{
    handle_prune, next_handling_prune, skip_to_handling_prune, Advance, BoxedPostList, MaxWeightSignal, PostList,
};
