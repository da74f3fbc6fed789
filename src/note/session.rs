use tracing::{debug, info, warn};

use super::engagement::{valid_stars, Reaction};
use super::node::{count_nodes, FileNode, Note, Visibility};
use super::ops::{self, UploadItem};
use super::selection::Selection;
use super::transaction::{PendingChanges, Snapshot};
use crate::auth::EditGrant;
use crate::error::{AppError, Result};
use crate::store::NoteStore;
use crate::view::Pager;

/// One open note: the working copy, its pending-change transaction, the
/// selected file, and the content pager.
///
/// All structural edits go through here so that the dirty flag, the
/// selection, and the pager stay in step with the working tree.
#[derive(Debug)]
pub struct NoteSession {
    note: Note,
    pending: PendingChanges,
    selection: Selection,
    pager: Pager,
    page_lines: usize,
    reaction: Reaction,
    user_rating: Option<u8>,
}

impl NoteSession {
    /// Load a note from the store and record one view.
    ///
    /// The view increment is fire-and-forget: a failure is logged and the
    /// note still opens.
    pub fn open(store: &mut dyn NoteStore, note_id: &str, page_lines: usize) -> Result<Self> {
        let mut note = store
            .load_note(note_id)?
            .ok_or_else(|| AppError::NoteNotFound(note_id.to_string()))?;

        match store.increment_view_count(note_id) {
            Ok(count) => note.view_count = count,
            Err(e) => warn!(note_id, error = %e, "view increment failed"),
        }

        info!(note_id, title = %note.title, nodes = count_nodes(&note.files), "note opened");
        Ok(Self::from_note(note, page_lines))
    }

    /// Wrap an already loaded note. Takes the snapshot and selects the
    /// first viewable file.
    pub fn from_note(note: Note, page_lines: usize) -> Self {
        let pending = PendingChanges::new(&note.files, note.visibility);
        let selection = Selection::first_in(&note.files);
        let mut session = Self {
            note,
            pending,
            selection,
            pager: Pager::default(),
            page_lines,
            reaction: Reaction::None,
            user_rating: None,
        };
        session.reset_pager();
        session
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn files(&self) -> &[FileNode] {
        &self.note.files
    }

    pub fn visibility(&self) -> Visibility {
        self.note.visibility
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_dirty()
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.pending.snapshot()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn selected_file(&self) -> Option<&FileNode> {
        self.selection.resolve(&self.note.files)
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn page_lines(&self) -> usize {
        self.page_lines
    }

    pub fn reaction(&self) -> Reaction {
        self.reaction
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.user_rating
    }

    // ── Selection & paging ──────────────────────────────────────────────

    /// Show a file. Directories and unknown ids leave the selection alone.
    pub fn select_file(&mut self, id: &str) -> bool {
        let changed = self.selection.select(&self.note.files, id);
        if changed {
            self.reset_pager();
        }
        changed
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }

    fn selected_line_count(&self) -> usize {
        self.selected_file()
            .and_then(FileNode::content)
            .map(|c| c.lines().count())
            .unwrap_or(0)
    }

    fn reset_pager(&mut self) {
        let total = Pager::pages_for(self.selected_line_count(), self.page_lines);
        self.pager.reset(total);
    }

    // ── Structural edits ────────────────────────────────────────────────

    /// Reject a grant issued for some other note.
    fn check_grant(&self, grant: &EditGrant) -> Result<()> {
        if grant.note_id() != self.note.id {
            warn!(note_id = %self.note.id, grant = grant.note_id(), "grant for another note");
            return Err(AppError::GrantMismatch(self.note.id.clone()));
        }
        Ok(())
    }

    /// Install an edited tree as the working copy.
    fn apply(&mut self, files: Vec<FileNode>) {
        self.note.files = files;
        self.pending.mark_dirty();
        if self.selection.reconcile(&self.note.files) {
            self.reset_pager();
        } else {
            let total = Pager::pages_for(self.selected_line_count(), self.page_lines);
            self.pager.set_total(total);
        }
    }

    pub fn delete_node(&mut self, grant: &EditGrant, id: &str) -> Result<()> {
        self.check_grant(grant)?;
        let files = ops::delete_node(&self.note.files, id);
        debug!(note_id = %self.note.id, node_id = id, "delete node");
        self.apply(files);
        Ok(())
    }

    pub fn create_folder(
        &mut self,
        grant: &EditGrant,
        parent: Option<&str>,
        name: &str,
    ) -> Result<()> {
        self.check_grant(grant)?;
        let files = ops::create_folder(&self.note.files, parent, name);
        debug!(note_id = %self.note.id, parent = ?parent, name, "create folder");
        self.apply(files);
        Ok(())
    }

    pub fn upload_files(
        &mut self,
        grant: &EditGrant,
        parent: Option<&str>,
        items: &[UploadItem],
    ) -> Result<()> {
        self.check_grant(grant)?;
        let files = ops::upload_files(&self.note.files, parent, items);
        debug!(note_id = %self.note.id, parent = ?parent, count = items.len(), "upload files");
        self.apply(files);
        Ok(())
    }

    pub fn rename_node(&mut self, grant: &EditGrant, id: &str, new_name: &str) -> Result<()> {
        self.check_grant(grant)?;
        let files = ops::rename_node(&self.note.files, id, new_name);
        debug!(note_id = %self.note.id, node_id = id, new_name, "rename node");
        self.apply(files);
        Ok(())
    }

    pub fn set_visibility(&mut self, grant: &EditGrant, visibility: Visibility) -> Result<()> {
        self.check_grant(grant)?;
        self.note.visibility = visibility;
        self.pending.mark_dirty();
        debug!(note_id = %self.note.id, %visibility, "set visibility");
        Ok(())
    }

    pub fn toggle_visibility(&mut self, grant: &EditGrant) -> Result<()> {
        let next = self.note.visibility.toggled();
        self.set_visibility(grant, next)
    }

    // ── Commit / discard ────────────────────────────────────────────────

    /// Persist the working tree and visibility, then make them the new
    /// snapshot.
    ///
    /// Returns `Ok(false)` when there was nothing to commit. If the store
    /// fails the transaction stays dirty and the snapshot is unchanged.
    pub fn commit(&mut self, store: &mut dyn NoteStore, grant: &EditGrant) -> Result<bool> {
        self.check_grant(grant)?;
        if !self.pending.is_dirty() {
            return Ok(false);
        }
        if let Err(e) = store.save_note(&self.note) {
            warn!(note_id = %self.note.id, error = %e, "commit failed, changes kept");
            return Err(e);
        }
        self.pending.promote(&self.note.files, self.note.visibility);
        info!(note_id = %self.note.id, "changes committed");
        Ok(true)
    }

    /// Throw away uncommitted edits and return to the snapshot.
    pub fn discard(&mut self, grant: &EditGrant) -> Result<()> {
        self.check_grant(grant)?;
        let (files, visibility) = self.pending.restore();
        self.note.files = files;
        self.note.visibility = visibility;
        if self.selection.reconcile(&self.note.files) {
            self.reset_pager();
        }
        info!(note_id = %self.note.id, "changes discarded");
        Ok(())
    }

    // ── Engagement ──────────────────────────────────────────────────────

    pub fn toggle_like(&mut self, store: &mut dyn NoteStore) -> Result<()> {
        self.react(store, Reaction::toggle_like)
    }

    pub fn toggle_dislike(&mut self, store: &mut dyn NoteStore) -> Result<()> {
        self.react(store, Reaction::toggle_dislike)
    }

    /// Apply a reaction change locally and send the counter deltas to the
    /// store. On failure the counters and reaction are put back.
    fn react(
        &mut self,
        store: &mut dyn NoteStore,
        toggle: fn(Reaction, &mut Note) -> Reaction,
    ) -> Result<()> {
        let (likes, dislikes) = (self.note.like_count, self.note.dislike_count);
        let next = toggle(self.reaction, &mut self.note);
        let like_delta = self.note.like_count as i64 - likes as i64;
        let dislike_delta = self.note.dislike_count as i64 - dislikes as i64;
        if let Err(e) = store.record_reaction(&self.note.id, like_delta, dislike_delta) {
            warn!(note_id = %self.note.id, error = %e, "reaction not saved");
            self.note.like_count = likes;
            self.note.dislike_count = dislikes;
            return Err(e);
        }
        self.reaction = next;
        debug!(note_id = %self.note.id, reaction = ?next, "reaction changed");
        Ok(())
    }

    /// Record a 1–5 star rating for this note. Each session rates once.
    pub fn rate(&mut self, store: &mut dyn NoteStore, stars: u8) -> Result<()> {
        if self.user_rating.is_some() {
            return Err(AppError::AlreadyRated(self.note.id.clone()));
        }
        if !valid_stars(stars) {
            return Err(AppError::Store(format!("rating must be 1-5, got {}", stars)));
        }
        store.record_rating(&self.note.id, stars)?;
        // Show the new vote without reloading the note.
        let total = self.note.rating as f64 * self.note.rating_count as f64 + f64::from(stars);
        self.note.rating_count += 1;
        self.note.rating = (total / self.note.rating_count as f64) as f32;
        self.user_rating = Some(stars);
        debug!(note_id = %self.note.id, stars, "note rated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Viewer;
    use crate::note::node::{contains_id, find_node};
    use crate::store::{JsonNoteStore, NoteSummary};
    use tempfile::TempDir;

    /// Store double whose writes can be switched to fail.
    struct FlakyStore {
        note: Note,
        fail_writes: bool,
        saves: usize,
    }

    impl NoteStore for FlakyStore {
        fn load_note(&self, id: &str) -> Result<Option<Note>> {
            Ok((self.note.id == id).then(|| self.note.clone()))
        }

        fn save_note(&mut self, note: &Note) -> Result<()> {
            if self.fail_writes {
                return Err(AppError::Store("backend unavailable".into()));
            }
            self.saves += 1;
            self.note.files = note.files.clone();
            self.note.visibility = note.visibility;
            Ok(())
        }

        fn increment_view_count(&mut self, _id: &str) -> Result<u64> {
            if self.fail_writes {
                return Err(AppError::Store("backend unavailable".into()));
            }
            self.note.view_count += 1;
            Ok(self.note.view_count)
        }

        fn record_rating(&mut self, _id: &str, _stars: u8) -> Result<()> {
            Ok(())
        }

        fn record_reaction(&mut self, _id: &str, like: i64, dislike: i64) -> Result<()> {
            if self.fail_writes {
                return Err(AppError::Store("backend unavailable".into()));
            }
            self.note.like_count = (self.note.like_count as i64 + like) as u64;
            self.note.dislike_count = (self.note.dislike_count as i64 + dislike) as u64;
            Ok(())
        }

        fn list_notes(&self) -> Result<Vec<NoteSummary>> {
            Ok(Vec::new())
        }

        fn create_note(&mut self, _note: &Note) -> Result<()> {
            Ok(())
        }
    }

    fn course_note() -> Note {
        let mut note = Note::new("Discrete Maths", "u1", Visibility::Private);
        let mut long = FileNode::file("long", "lecture.md");
        if let FileNode::File(f) = &mut long {
            f.content = Some((1..=25).map(|i| format!("line {}\n", i)).collect());
        }
        note.files = vec![
            FileNode::directory_with("d1", "Week 1", vec![long, FileNode::file("a", "sets.md")]),
            FileNode::file("b", "readme.md"),
        ];
        note
    }

    fn open_session() -> (NoteSession, EditGrant) {
        let note = course_note();
        let grant = Viewer::new("u1").authorize_edit(&note).unwrap();
        (NoteSession::from_note(note, 10), grant)
    }

    fn flaky() -> FlakyStore {
        FlakyStore {
            note: course_note(),
            fail_writes: false,
            saves: 0,
        }
    }

    #[test]
    fn from_note_selects_first_file_clean() {
        let (session, _) = open_session();
        assert_eq!(session.selected_id(), Some("long"));
        assert!(!session.is_dirty());
        assert_eq!(session.pager().total_pages, 3);
    }

    #[test]
    fn open_increments_view_count() {
        let mut store = flaky();
        let id = store.note.id.clone();
        let session = NoteSession::open(&mut store, &id, 10).unwrap();
        assert_eq!(session.note().view_count, 1);
        assert_eq!(store.note.view_count, 1);
    }

    #[test]
    fn open_survives_view_increment_failure() {
        let mut store = flaky();
        store.fail_writes = true;
        let id = store.note.id.clone();
        let session = NoteSession::open(&mut store, &id, 10).unwrap();
        assert_eq!(session.note().view_count, 0);
    }

    #[test]
    fn open_missing_note_is_not_found() {
        let mut store = flaky();
        let err = NoteSession::open(&mut store, "ghost", 10).unwrap_err();
        assert!(matches!(err, AppError::NoteNotFound(_)));
    }

    #[test]
    fn edit_marks_dirty() {
        let (mut session, grant) = open_session();
        session.create_folder(&grant, None, "Algebra").unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.files().last().unwrap().name(), "Algebra");
    }

    #[test]
    fn edit_on_missing_id_still_marks_dirty() {
        let (mut session, grant) = open_session();
        let before = session.files().to_vec();
        session.delete_node(&grant, "ghost").unwrap();
        assert_eq!(session.files(), before.as_slice());
        assert!(session.is_dirty());
    }

    #[test]
    fn deleting_selected_file_selects_next_first_file() {
        let (mut session, grant) = open_session();
        session.next_page();
        session.delete_node(&grant, "long").unwrap();
        assert_eq!(session.selected_id(), Some("a"));
        assert_eq!(session.pager().current_page, 1);
    }

    #[test]
    fn deleting_parent_of_selection_reselects() {
        let (mut session, grant) = open_session();
        session.delete_node(&grant, "d1").unwrap();
        assert_eq!(session.selected_id(), Some("b"));
    }

    #[test]
    fn deleting_last_file_clears_selection() {
        let mut note = Note::new("Solo", "u1", Visibility::Private);
        note.files = vec![FileNode::file("a", "syllabus.md")];
        let grant = Viewer::new("u1").authorize_edit(&note).unwrap();
        let mut session = NoteSession::from_note(note, 10);
        assert_eq!(session.selected_id(), Some("a"));
        session.delete_node(&grant, "a").unwrap();
        assert!(session.files().is_empty());
        assert!(session.selected_id().is_none());
        assert!(session.selected_file().is_none());
    }

    #[test]
    fn deleting_other_node_keeps_selection_and_page() {
        let (mut session, grant) = open_session();
        session.next_page();
        session.delete_node(&grant, "b").unwrap();
        assert_eq!(session.selected_id(), Some("long"));
        assert_eq!(session.pager().current_page, 2);
    }

    #[test]
    fn select_file_resets_page() {
        let (mut session, _) = open_session();
        session.next_page();
        assert!(session.select_file("a"));
        assert_eq!(session.pager().current_page, 1);
        assert_eq!(session.pager().total_pages, 1);
    }

    #[test]
    fn rename_selected_keeps_selection() {
        let (mut session, grant) = open_session();
        session.rename_node(&grant, "long", "lecture-1.md").unwrap();
        assert_eq!(session.selected_file().unwrap().name(), "lecture-1.md");
    }

    #[test]
    fn upload_into_directory() {
        let (mut session, grant) = open_session();
        session.upload_files(&grant, Some("d1"), &[UploadItem::new("notes.pdf", 1024)]).unwrap();
        let week = find_node(session.files(), "d1").unwrap();
        assert_eq!(week.children().len(), 3);
        assert_eq!(week.children()[2].name(), "notes.pdf");
    }

    #[test]
    fn discard_restores_snapshot() {
        let (mut session, grant) = open_session();
        let original = session.files().to_vec();
        session.delete_node(&grant, "d1").unwrap();
        session.create_folder(&grant, None, "Algebra").unwrap();
        session.toggle_visibility(&grant).unwrap();
        session.discard(&grant).unwrap();
        assert_eq!(session.files(), original.as_slice());
        assert_eq!(session.visibility(), Visibility::Private);
        assert!(!session.is_dirty());
    }

    #[test]
    fn discard_reselects_when_selection_vanished() {
        let (mut session, grant) = open_session();
        session.upload_files(&grant, None, &[UploadItem::new("new.md", 3)]).unwrap();
        let new_id = session.files().last().unwrap().id().to_string();
        session.select_file(&new_id);
        session.discard(&grant).unwrap();
        assert!(!contains_id(session.files(), &new_id));
        assert_eq!(session.selected_id(), Some("long"));
    }

    #[test]
    fn commit_persists_and_promotes() {
        let mut store = flaky();
        let id = store.note.id.clone();
        let mut session = NoteSession::open(&mut store, &id, 10).unwrap();
        let grant = Viewer::new("u1").authorize_edit(session.note()).unwrap();
        session.rename_node(&grant, "b", "README.md").unwrap();
        session.toggle_visibility(&grant).unwrap();

        assert!(session.commit(&mut store, &grant).unwrap());
        assert!(!session.is_dirty());
        assert_eq!(session.snapshot().files, session.files());
        assert_eq!(session.snapshot().visibility, Visibility::Public);
        assert_eq!(store.note.visibility, Visibility::Public);
        assert_eq!(find_node(&store.note.files, "b").unwrap().name(), "README.md");
    }

    #[test]
    fn commit_when_clean_skips_store() {
        let mut store = flaky();
        let (mut session, grant) = open_session();
        assert!(!session.commit(&mut store, &grant).unwrap());
        assert!(!session.commit(&mut store, &grant).unwrap());
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn commit_twice_is_stable() {
        let mut store = flaky();
        let (mut session, grant) = open_session();
        session.create_folder(&grant, None, "Algebra").unwrap();
        session.commit(&mut store, &grant).unwrap();
        let files = session.files().to_vec();
        session.commit(&mut store, &grant).unwrap();
        assert_eq!(session.files(), files.as_slice());
        assert_eq!(session.snapshot().files, files);
        assert!(!session.is_dirty());
    }

    #[test]
    fn failed_commit_stays_dirty() {
        let mut store = flaky();
        let (mut session, grant) = open_session();
        let before = session.snapshot().clone();
        session.delete_node(&grant, "b").unwrap();
        store.fail_writes = true;

        let err = session.commit(&mut store, &grant).unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert!(session.is_dirty());
        assert_eq!(session.snapshot(), &before);
        assert!(!contains_id(session.files(), "b"));
    }

    #[test]
    fn grant_for_other_note_is_rejected() {
        let (mut session, _) = open_session();
        let other = Note::new("Other", "u1", Visibility::Private);
        let foreign = Viewer::new("u1").authorize_edit(&other).unwrap();
        let before = session.files().to_vec();

        let err = session.delete_node(&foreign, "b").unwrap_err();
        assert!(matches!(err, AppError::GrantMismatch(_)));
        assert!(session.toggle_visibility(&foreign).is_err());
        assert!(session.discard(&foreign).is_err());
        let mut store = flaky();
        assert!(session.commit(&mut store, &foreign).is_err());
        assert_eq!(session.files(), before.as_slice());
        assert_eq!(session.visibility(), Visibility::Private);
        assert!(!session.is_dirty());
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn likes_reach_store_without_dirtying() {
        let mut store = flaky();
        let (mut session, _) = open_session();
        session.toggle_like(&mut store).unwrap();
        assert_eq!(session.note().like_count, 1);
        assert_eq!(session.reaction(), Reaction::Liked);
        assert_eq!(store.note.like_count, 1);
        session.toggle_dislike(&mut store).unwrap();
        assert_eq!(session.note().like_count, 0);
        assert_eq!(session.note().dislike_count, 1);
        assert_eq!(store.note.like_count, 0);
        assert_eq!(store.note.dislike_count, 1);
        assert!(!session.is_dirty());
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn failed_reaction_rolls_back() {
        let mut store = flaky();
        store.fail_writes = true;
        let (mut session, _) = open_session();
        assert!(session.toggle_like(&mut store).is_err());
        assert_eq!(session.note().like_count, 0);
        assert_eq!(session.reaction(), Reaction::None);
    }

    #[test]
    fn rating_goes_to_store() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonNoteStore::open(dir.path()).unwrap();
        let note = course_note();
        store.create_note(&note).unwrap();
        let mut session = NoteSession::open(&mut store, &note.id, 10).unwrap();
        assert!(session.rate(&mut store, 9).is_err());
        assert_eq!(session.user_rating(), None);
        session.rate(&mut store, 4).unwrap();
        assert_eq!(session.user_rating(), Some(4));
        let stored = store.load_note(&note.id).unwrap().unwrap();
        assert_eq!(stored.rating_count, 1);
        assert!((stored.rating - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn second_rating_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonNoteStore::open(dir.path()).unwrap();
        let note = course_note();
        store.create_note(&note).unwrap();
        let mut session = NoteSession::open(&mut store, &note.id, 10).unwrap();

        session.rate(&mut store, 5).unwrap();
        let err = session.rate(&mut store, 1).unwrap_err();
        assert!(matches!(err, AppError::AlreadyRated(_)));
        assert_eq!(session.user_rating(), Some(5));
        assert_eq!(session.note().rating_count, 1);

        let stored = store.load_note(&note.id).unwrap().unwrap();
        assert_eq!(stored.rating_count, 1);
        assert!((stored.rating - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn commit_keeps_counters_written_by_other_viewers() {
        let dir = TempDir::new().unwrap();
        let mut alice_store = JsonNoteStore::open(dir.path()).unwrap();
        let mut bob_store = JsonNoteStore::open(dir.path()).unwrap();
        let note = course_note();
        alice_store.create_note(&note).unwrap();

        let mut alice = NoteSession::open(&mut alice_store, &note.id, 10).unwrap();
        let grant = Viewer::new("u1").authorize_edit(alice.note()).unwrap();

        let mut bob = NoteSession::open(&mut bob_store, &note.id, 10).unwrap();
        bob.rate(&mut bob_store, 4).unwrap();
        bob.toggle_like(&mut bob_store).unwrap();

        alice.create_folder(&grant, None, "Week 2").unwrap();
        assert!(alice.commit(&mut alice_store, &grant).unwrap());

        let stored = alice_store.load_note(&note.id).unwrap().unwrap();
        assert_eq!(stored.files.last().unwrap().name(), "Week 2");
        assert_eq!(stored.view_count, 2);
        assert_eq!(stored.rating_count, 1);
        assert!((stored.rating - 4.0).abs() < f32::EPSILON);
        assert_eq!(stored.like_count, 1);
    }

    #[test]
    fn json_store_round_trip_through_commit() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonNoteStore::open(dir.path()).unwrap();
        let note = course_note();
        store.create_note(&note).unwrap();

        let mut session = NoteSession::open(&mut store, &note.id, 10).unwrap();
        let grant = Viewer::new("u1").authorize_edit(session.note()).unwrap();
        session.create_folder(&grant, Some("d1"), "Exercises").unwrap();
        session.commit(&mut store, &grant).unwrap();

        let reopened = NoteSession::open(&mut store, &note.id, 10).unwrap();
        let week = find_node(reopened.files(), "d1").unwrap();
        assert_eq!(week.children().last().unwrap().name(), "Exercises");
        assert_eq!(reopened.note().view_count, 2);
    }
}
