//! The note file-tree core: model, pure tree edits, selection, and the
//! pending-change transaction.

pub mod engagement;
pub mod node;
pub mod ops;
pub mod selection;
pub mod session;
pub mod transaction;

pub use engagement::Reaction;
pub use node::{contains_id, count_files, find_node, FileNode, Note, Visibility};
pub use ops::UploadItem;
pub use session::NoteSession;
