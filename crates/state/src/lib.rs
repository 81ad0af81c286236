mod index;
mod reducer;

pub use index::CommentTreeIndex;
pub use reducer::apply;
