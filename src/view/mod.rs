pub mod pager;
pub mod tree;

pub use pager::Pager;
pub use tree::{FlatItem, TreeView};
