use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from the note store or imported files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A note document could not be encoded or decoded.
    #[error("Invalid note document: {0}")]
    Json(#[from] serde_json::Error),

    /// No note with the given id exists in the store.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The note store rejected an operation.
    #[error("Store error: {0}")]
    Store(String),

    /// An edit grant was presented for a different note.
    #[error("Edit grant does not cover note {0}")]
    GrantMismatch(String),

    /// The viewer has already rated this note.
    #[error("Note {0} was already rated")]
    AlreadyRated(String),

    /// The log subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}
