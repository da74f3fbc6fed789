pub mod import;
pub mod json;

use crate::error::Result;
use crate::note::{Note, Visibility};

pub use json::JsonNoteStore;

/// One line of a note listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub visibility: Visibility,
    pub file_count: usize,
}

/// The system of record for notes.
pub trait NoteStore {
    /// Fetch a whole note by id; `Ok(None)` when it does not exist.
    fn load_note(&self, id: &str) -> Result<Option<Note>>;

    /// Persist the note's file tree and visibility. Counters kept by the
    /// store (views, rating, reactions) are left as stored. Fails with
    /// `NoteNotFound` when the note does not exist.
    fn save_note(&mut self, note: &Note) -> Result<()>;

    /// Bump the stored view counter, returning the new count.
    fn increment_view_count(&mut self, id: &str) -> Result<u64>;

    /// Store a viewer's star rating for a note.
    fn record_rating(&mut self, id: &str, stars: u8) -> Result<()>;

    /// Shift the stored like and dislike counters. Counters never drop
    /// below zero.
    fn record_reaction(&mut self, id: &str, like_delta: i64, dislike_delta: i64) -> Result<()>;

    /// Summaries of every stored note.
    fn list_notes(&self) -> Result<Vec<NoteSummary>>;

    /// Store a brand-new note; fails if the id is taken.
    fn create_note(&mut self, note: &Note) -> Result<()>;
}
