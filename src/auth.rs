//! Edit capability for a note.
//!
//! Authorship is decided here, once, before any edit reaches the session.
//! Mutating session calls take an [`EditGrant`] and never inspect the
//! viewer themselves.

use crate::note::Note;

/// The user looking at a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Grant edit rights on `note` when the viewer is its author.
    pub fn authorize_edit(&self, note: &Note) -> Option<EditGrant> {
        if note.author_id == self.user_id {
            Some(EditGrant {
                note_id: note.id.clone(),
            })
        } else {
            None
        }
    }
}

/// Proof that the current viewer may edit a specific note.
///
/// Only obtainable through [`Viewer::authorize_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditGrant {
    note_id: String,
}

impl EditGrant {
    pub fn note_id(&self) -> &str {
        &self.note_id
    }
}
