use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use super::{NoteStore, NoteSummary};
use crate::error::{AppError, Result};
use crate::note::{count_files, Note};

const NOTE_EXT: &str = "json";

/// Note store backed by a directory of `<note-id>.json` documents.
#[derive(Debug, Clone)]
pub struct JsonNoteStore {
    root: PathBuf,
}

impl JsonNoteStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn note_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty()
            || id.starts_with('.')
            || id.contains(|c: char| c == '/' || c == '\\')
        {
            return Err(AppError::InvalidPath(format!("bad note id {:?}", id)));
        }
        Ok(self.root.join(format!("{}.{}", id, NOTE_EXT)))
    }

    fn read(&self, path: &Path) -> Result<Note> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write through a sibling temp file and rename, so readers never see a
    /// half-written document.
    fn write(&self, path: &Path, note: &Note) -> Result<()> {
        let body = serde_json::to_string_pretty(note)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        debug!(note_id = %note.id, path = %path.display(), "note written");
        Ok(())
    }

    fn load_existing(&self, id: &str) -> Result<(PathBuf, Note)> {
        let path = self.note_path(id)?;
        if !path.exists() {
            return Err(AppError::NoteNotFound(id.to_string()));
        }
        let note = self.read(&path)?;
        Ok((path, note))
    }
}

impl NoteStore for JsonNoteStore {
    fn load_note(&self, id: &str) -> Result<Option<Note>> {
        let path = self.note_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        self.read(&path).map(Some)
    }

    fn save_note(&mut self, note: &Note) -> Result<()> {
        // Re-read so counters bumped by other sessions survive the write.
        let (path, mut stored) = self.load_existing(&note.id)?;
        stored.files = note.files.clone();
        stored.visibility = note.visibility;
        stored.updated_at = Utc::now();
        self.write(&path, &stored)
    }

    fn increment_view_count(&mut self, id: &str) -> Result<u64> {
        let (path, mut note) = self.load_existing(id)?;
        note.view_count += 1;
        self.write(&path, &note)?;
        Ok(note.view_count)
    }

    fn record_rating(&mut self, id: &str, stars: u8) -> Result<()> {
        let (path, mut note) = self.load_existing(id)?;
        let total = note.rating as f64 * note.rating_count as f64 + f64::from(stars);
        note.rating_count += 1;
        note.rating = (total / note.rating_count as f64) as f32;
        self.write(&path, &note)
    }

    fn record_reaction(&mut self, id: &str, like_delta: i64, dislike_delta: i64) -> Result<()> {
        let (path, mut note) = self.load_existing(id)?;
        note.like_count = shift(note.like_count, like_delta);
        note.dislike_count = shift(note.dislike_count, dislike_delta);
        self.write(&path, &note)
    }

    fn list_notes(&self) -> Result<Vec<NoteSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(NOTE_EXT) {
                continue;
            }
            match self.read(&path) {
                Ok(note) => summaries.push(NoteSummary {
                    file_count: count_files(&note.files),
                    id: note.id,
                    title: note.title,
                    author_id: note.author_id,
                    visibility: note.visibility,
                }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable note"),
            }
        }
        summaries.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(summaries)
    }

    fn create_note(&mut self, note: &Note) -> Result<()> {
        let path = self.note_path(&note.id)?;
        if path.exists() {
            return Err(AppError::Store(format!("note {} already exists", note.id)));
        }
        self.write(&path, note)
    }
}

fn shift(count: u64, delta: i64) -> u64 {
    if delta < 0 {
        count.saturating_sub(delta.unsigned_abs())
    } else {
        count.saturating_add(delta as u64)
    }
}
