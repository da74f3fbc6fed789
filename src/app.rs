use std::time::Instant;

use chrono::{DateTime, Utc};
use ratatui::text::Line;
use tracing::warn;

use crate::auth::{EditGrant, Viewer};
use crate::components::help::HelpOverlay;
use crate::config::AppConfig;
use crate::content::{self, Highlighter};
use crate::error::{AppError, Result};
use crate::note::{FileNode, NoteSession};
use crate::store::import::{parse_path_list, read_upload_items};
use crate::store::NoteStore;
use crate::theme::{self, ThemeColors};
use crate::view::TreeView;

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// New folder under `parent`, or at root level when `None`.
    NewFolder { parent: Option<String> },
    /// Comma-separated local paths to upload under `parent`.
    Upload { parent: Option<String> },
    Rename { id: String },
    DeleteConfirm { id: String, name: String },
    DiscardConfirm,
    Error { message: String },
}

impl DialogKind {
    /// Whether the dialog takes typed input (as opposed to y/n or dismiss).
    pub fn has_input(&self) -> bool {
        matches!(
            self,
            DialogKind::NewFolder { .. } | DialogKind::Upload { .. } | DialogKind::Rename { .. }
        )
    }
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
    Help,
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    /// Byte offset into `input`, always on a char boundary.
    pub cursor_position: usize,
}

/// Highlighted lines for the file shown in the content panel.
#[derive(Debug, Default)]
pub struct ContentView {
    pub(crate) key: Option<(String, DateTime<Utc>)>,
    pub lines: Vec<Line<'static>>,
    /// False when the file has no text and `lines` holds its metadata.
    pub is_text: bool,
}

/// Main application state.
pub struct App {
    pub session: NoteSession,
    store: Box<dyn NoteStore>,
    grant: Option<EditGrant>,
    pub tree_view: TreeView,
    pub should_quit: bool,
    pub mode: AppMode,
    pub help_scroll: usize,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, Instant)>,
    pub sidebar_collapsed: bool,
    pub config: AppConfig,
    pub theme: ThemeColors,
    pub content: ContentView,
    highlighter: Highlighter,
}

impl App {
    /// Open `note_id` from `store` for `viewer`.
    pub fn new(
        mut store: Box<dyn NoteStore>,
        note_id: &str,
        viewer: &Viewer,
        config: AppConfig,
    ) -> Result<Self> {
        let session = NoteSession::open(store.as_mut(), note_id, config.page_lines())?;
        let grant = viewer.authorize_edit(session.note());
        let mut tree_view = TreeView::new(session.files());
        if let Some(id) = session.selected_id() {
            let id = id.to_string();
            tree_view.reveal(session.files(), &id);
        }
        let theme = theme::resolve_theme(&config.theme);
        let highlighter = Highlighter::new(config.syntax_theme_name());

        let mut app = Self {
            session,
            store,
            grant,
            tree_view,
            should_quit: false,
            mode: AppMode::Normal,
            help_scroll: 0,
            dialog_state: DialogState::default(),
            status_message: None,
            sidebar_collapsed: false,
            config,
            theme,
            content: ContentView::default(),
            highlighter,
        };
        app.refresh_content();
        Ok(app)
    }

    pub fn can_edit(&self) -> bool {
        self.grant.is_some()
    }

    /// The edit grant, or a status message explaining why there is none.
    fn require_grant(&mut self) -> Option<EditGrant> {
        if self.grant.is_none() {
            self.set_status_message("Only the author can edit this note".to_string());
        }
        self.grant.clone()
    }

    /// Rebuild tree rows after the working tree changed.
    fn sync_tree(&mut self) {
        self.tree_view.flatten(self.session.files());
        self.refresh_content();
    }

    /// Re-highlight the selected file if it changed since last time.
    pub fn refresh_content(&mut self) {
        let Some(node) = self.session.selected_file() else {
            self.content = ContentView::default();
            return;
        };
        let key = (node.id().to_string(), node.updated_at());
        if self.content.key.as_ref() == Some(&key) {
            return;
        }
        let (lines, is_text) = match node.content() {
            Some(text) => (self.highlighter.highlight(node.name(), text), true),
            None => (content::file_metadata_lines(node), false),
        };
        self.content = ContentView {
            key: Some(key),
            lines,
            is_text,
        };
    }

    // ── Dialogs ─────────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        if let DialogKind::Rename { ref id } = kind {
            if let Some(node) = crate::note::find_node(self.session.files(), id) {
                let name = node.name().to_string();
                self.dialog_state.cursor_position = name.len();
                self.dialog_state.input = name;
            }
        }
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    fn show_error(&mut self, message: String) {
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Dialog(DialogKind::Error { message });
    }

    /// Show the error from a rejected edit. Returns whether the edit went
    /// through.
    fn edit_applied(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "edit rejected");
                self.show_error(format!("Edit rejected: {}", e));
                false
            }
        }
    }

    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    pub fn dialog_move_cursor_left(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
        }
    }

    pub fn dialog_move_cursor_right(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(next) = self.dialog_state.input[pos..].chars().next() {
            self.dialog_state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    /// Act on the open dialog's input (Enter, or `y` on a confirmation).
    pub fn confirm_dialog(&mut self) {
        let AppMode::Dialog(kind) = self.mode.clone() else {
            return;
        };
        match kind {
            DialogKind::NewFolder { parent } => self.submit_new_folder(parent),
            DialogKind::Upload { parent } => self.submit_upload(parent),
            DialogKind::Rename { id } => self.submit_rename(&id),
            DialogKind::DeleteConfirm { id, .. } => {
                self.close_dialog();
                self.delete_node(&id);
            }
            DialogKind::DiscardConfirm => {
                self.close_dialog();
                self.discard();
            }
            DialogKind::Error { .. } => self.close_dialog(),
        }
    }

    fn submit_new_folder(&mut self, parent: Option<String>) {
        let Some(grant) = self.require_grant() else {
            self.close_dialog();
            return;
        };
        let input = self.dialog_state.input.clone();
        if input.trim().is_empty() {
            self.set_status_message("Folder name cannot be empty".to_string());
            return;
        }
        // Root folder names are trimmed; nested ones are kept as typed.
        let name = match parent {
            None => input.trim(),
            Some(_) => input.as_str(),
        };
        self.close_dialog();
        let result = self.session.create_folder(&grant, parent.as_deref(), name);
        if !self.edit_applied(result) {
            return;
        }
        self.sync_tree();
        self.set_status_message(format!(
            "Folder \"{}\" created. Don't forget to commit your changes.",
            name
        ));
    }

    fn submit_upload(&mut self, parent: Option<String>) {
        let Some(grant) = self.require_grant() else {
            self.close_dialog();
            return;
        };
        let paths = parse_path_list(&self.dialog_state.input);
        if paths.is_empty() {
            self.set_status_message("Enter at least one file path".to_string());
            return;
        }
        self.close_dialog();
        match read_upload_items(&paths) {
            Ok(items) => {
                let result = self.session.upload_files(&grant, parent.as_deref(), &items);
                if !self.edit_applied(result) {
                    return;
                }
                self.sync_tree();
                self.set_status_message(format!(
                    "{} file(s) uploaded. Don't forget to commit your changes.",
                    items.len()
                ));
            }
            Err(e) => {
                warn!(error = %e, "upload rejected");
                self.show_error(format!("Upload failed: {}", e));
            }
        }
    }

    fn submit_rename(&mut self, id: &str) {
        let Some(grant) = self.require_grant() else {
            self.close_dialog();
            return;
        };
        let name = self.dialog_state.input.clone();
        if name.trim().is_empty() {
            self.set_status_message("Name cannot be empty".to_string());
            return;
        }
        self.close_dialog();
        let result = self.session.rename_node(&grant, id, &name);
        if !self.edit_applied(result) {
            return;
        }
        self.sync_tree();
        self.set_status_message(format!("Renamed to \"{}\"", name));
    }

    // ── Edit entry points (keys) ────────────────────────────────────────

    /// `A` / `N`: ask for a folder name inside the directory under the
    /// cursor, or at root level.
    pub fn begin_new_folder(&mut self, at_root: bool) {
        if self.require_grant().is_none() {
            return;
        }
        let parent = if at_root {
            None
        } else {
            self.tree_view.target_dir().map(str::to_string)
        };
        self.open_dialog(DialogKind::NewFolder { parent });
    }

    /// `u` / `U`: ask for local paths to upload.
    pub fn begin_upload(&mut self, at_root: bool) {
        if self.require_grant().is_none() {
            return;
        }
        let parent = if at_root {
            None
        } else {
            self.tree_view.target_dir().map(str::to_string)
        };
        self.open_dialog(DialogKind::Upload { parent });
    }

    pub fn begin_rename(&mut self) {
        if self.require_grant().is_none() {
            return;
        }
        if let Some(id) = self.tree_view.selected_id().map(str::to_string) {
            self.open_dialog(DialogKind::Rename { id });
        }
    }

    pub fn begin_delete(&mut self) {
        if self.require_grant().is_none() {
            return;
        }
        let Some(item) = self.tree_view.selected_item() else {
            return;
        };
        let (id, name) = (item.id.clone(), item.name.clone());
        if self.config.confirm_delete() {
            self.open_dialog(DialogKind::DeleteConfirm { id, name });
        } else {
            self.delete_node(&id);
        }
    }

    fn delete_node(&mut self, id: &str) {
        let Some(grant) = self.require_grant() else {
            return;
        };
        let name = crate::note::find_node(self.session.files(), id)
            .map(|n| n.name().to_string())
            .unwrap_or_default();
        let result = self.session.delete_node(&grant, id);
        if !self.edit_applied(result) {
            return;
        }
        self.sync_tree();
        self.set_status_message(format!(
            "\"{}\" deleted. Don't forget to commit your changes.",
            name
        ));
    }

    pub fn toggle_visibility(&mut self) {
        let Some(grant) = self.require_grant() else {
            return;
        };
        let result = self.session.toggle_visibility(&grant);
        if !self.edit_applied(result) {
            return;
        }
        self.set_status_message(format!(
            "Visibility set to {}. Commit to save.",
            self.session.visibility()
        ));
    }

    pub fn commit(&mut self) {
        let Some(grant) = self.require_grant() else {
            return;
        };
        match self.session.commit(self.store.as_mut(), &grant) {
            Ok(true) => self.set_status_message("Changes committed".to_string()),
            Ok(false) => self.set_status_message("Nothing to commit".to_string()),
            Err(e) => self.show_error(format!("Commit failed: {}", e)),
        }
    }

    /// `X`: discard, asking first when configured to.
    pub fn begin_discard(&mut self) {
        if self.require_grant().is_none() {
            return;
        }
        if !self.session.is_dirty() {
            self.set_status_message("No pending changes".to_string());
            return;
        }
        if self.config.confirm_discard() {
            self.open_dialog(DialogKind::DiscardConfirm);
        } else {
            self.discard();
        }
    }

    fn discard(&mut self) {
        let Some(grant) = self.require_grant() else {
            return;
        };
        let result = self.session.discard(&grant);
        if !self.edit_applied(result) {
            return;
        }
        self.sync_tree();
        self.set_status_message("Changes discarded".to_string());
    }

    // ── Engagement ──────────────────────────────────────────────────────

    pub fn toggle_like(&mut self) {
        if let Err(e) = self.session.toggle_like(self.store.as_mut()) {
            self.set_status_message(format!("Reaction not saved: {}", e));
        }
    }

    pub fn toggle_dislike(&mut self) {
        if let Err(e) = self.session.toggle_dislike(self.store.as_mut()) {
            self.set_status_message(format!("Reaction not saved: {}", e));
        }
    }

    pub fn rate(&mut self, stars: u8) {
        match self.session.rate(self.store.as_mut(), stars) {
            Ok(()) => self.set_status_message(format!("Rated {} star(s)", stars)),
            Err(AppError::AlreadyRated(_)) => {
                self.set_status_message("You already rated this note".to_string())
            }
            Err(e) => self.show_error(format!("Rating failed: {}", e)),
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        self.tree_view.select_next();
    }

    pub fn select_previous(&mut self) {
        self.tree_view.select_prev();
    }

    pub fn select_first(&mut self) {
        self.tree_view.select_first();
    }

    pub fn select_last(&mut self) {
        self.tree_view.select_last();
    }

    /// `Enter` / `l`: expand or collapse a directory, or show a file.
    pub fn activate_selected(&mut self) {
        let Some((id, is_dir)) = self
            .tree_view
            .selected_item()
            .map(|item| (item.id.clone(), item.is_dir))
        else {
            return;
        };
        if is_dir {
            if !self.tree_view.expand_selected(self.session.files()) {
                self.tree_view.collapse_selected(self.session.files());
            }
            return;
        }
        if self.session.select_file(&id) {
            self.refresh_content();
        }
    }

    pub fn collapse_selected(&mut self) {
        self.tree_view.collapse_selected(self.session.files());
    }

    pub fn next_page(&mut self) {
        self.session.next_page();
    }

    pub fn prev_page(&mut self) {
        self.session.prev_page();
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
        self.help_scroll = 0;
    }

    pub fn scroll_help(&mut self, down: bool) {
        if down {
            let max = HelpOverlay::total_lines().saturating_sub(1);
            self.help_scroll = (self.help_scroll + 1).min(max);
        } else {
            self.help_scroll = self.help_scroll.saturating_sub(1);
        }
    }

    /// The file currently shown in the content panel.
    pub fn shown_file(&self) -> Option<&FileNode> {
        self.session.selected_file()
    }

    // ── Status ──────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() >= 3 {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneralConfig;
    use crate::note::{contains_id, find_node, Note, Visibility};
    use crate::store::JsonNoteStore;
    use std::fs;
    use tempfile::TempDir;

    fn seed_note() -> Note {
        let mut note = Note::new("Linear Algebra", "alice", Visibility::Private);
        let mut intro = FileNode::file("a", "intro.md");
        if let FileNode::File(f) = &mut intro {
            f.content = Some("# Vectors\n\nA vector is...\n".to_string());
        }
        note.files = vec![
            FileNode::directory_with("d1", "Week 1", vec![intro]),
            FileNode::file("b", "slides.pdf"),
        ];
        note
    }

    fn setup_app_as(user: &str, config: AppConfig) -> (TempDir, App, String) {
        let dir = TempDir::new().unwrap();
        let mut store = JsonNoteStore::open(&dir.path().join("notes")).unwrap();
        let note = seed_note();
        store.create_note(&note).unwrap();
        let app = App::new(Box::new(store), &note.id, &Viewer::new(user), config).unwrap();
        (dir, app, note.id)
    }

    fn setup_app() -> (TempDir, App, String) {
        setup_app_as("alice", AppConfig::default())
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.dialog_input_char(c);
        }
    }

    fn stored(dir: &TempDir, id: &str) -> Note {
        JsonNoteStore::open(&dir.path().join("notes"))
            .unwrap()
            .load_note(id)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn opens_with_first_file_shown() {
        let (_dir, app, _) = setup_app();
        assert_eq!(app.session.selected_id(), Some("a"));
        assert_eq!(app.tree_view.selected_id(), Some("a"));
        assert!(app.content.is_text);
        assert_eq!(app.content.lines.len(), 3);
        assert!(app.can_edit());
    }

    #[test]
    fn missing_note_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let store = JsonNoteStore::open(dir.path()).unwrap();
        let result = App::new(
            Box::new(store),
            "nope",
            &Viewer::new("alice"),
            AppConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn non_author_cannot_edit() {
        let (_dir, mut app, _) = setup_app_as("bob", AppConfig::default());
        assert!(!app.can_edit());
        app.begin_delete();
        app.begin_new_folder(true);
        app.toggle_visibility();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.session.is_dirty());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("Only the author"));
    }

    #[test]
    fn non_author_reaction_is_stored() {
        let (dir, mut app, id) = setup_app_as("bob", AppConfig::default());
        app.toggle_like();
        assert_eq!(app.session.note().like_count, 1);
        assert_eq!(stored(&dir, &id).like_count, 1);
        app.toggle_dislike();
        let note = stored(&dir, &id);
        assert_eq!((note.like_count, note.dislike_count), (0, 1));
    }

    #[test]
    fn new_root_folder_is_trimmed() {
        let (_dir, mut app, _) = setup_app();
        app.begin_new_folder(true);
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::NewFolder { parent: None }));
        type_str(&mut app, "  Week 2  ");
        app.confirm_dialog();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.files().last().unwrap().name(), "Week 2");
        assert!(app.session.is_dirty());
        assert_eq!(app.tree_view.flat_items.last().unwrap().name, "Week 2");
    }

    #[test]
    fn empty_folder_name_is_rejected() {
        let (_dir, mut app, _) = setup_app();
        app.begin_new_folder(true);
        type_str(&mut app, "   ");
        app.confirm_dialog();
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::NewFolder { .. })));
        assert!(!app.session.is_dirty());
        assert_eq!(app.session.files().len(), 2);
    }

    #[test]
    fn new_folder_goes_into_cursor_directory() {
        let (_dir, mut app, _) = setup_app();
        // cursor is on intro.md inside Week 1
        app.begin_new_folder(false);
        assert_eq!(
            app.mode,
            AppMode::Dialog(DialogKind::NewFolder {
                parent: Some("d1".to_string())
            })
        );
        type_str(&mut app, "Exercises");
        app.confirm_dialog();
        let week = find_node(app.session.files(), "d1").unwrap();
        assert_eq!(week.children().last().unwrap().name(), "Exercises");
    }

    #[test]
    fn rename_prefills_and_applies() {
        let (_dir, mut app, _) = setup_app();
        app.begin_rename();
        assert_eq!(app.dialog_state.input, "intro.md");
        assert_eq!(app.dialog_state.cursor_position, 8);
        app.dialog_cursor_home();
        type_str(&mut app, "01-");
        app.confirm_dialog();
        assert_eq!(find_node(app.session.files(), "a").unwrap().name(), "01-intro.md");
    }

    #[test]
    fn delete_with_confirmation() {
        let (_dir, mut app, _) = setup_app();
        app.select_last();
        app.begin_delete();
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::DeleteConfirm { .. })));
        app.confirm_dialog();
        assert!(!contains_id(app.session.files(), "b"));
        assert_eq!(app.tree_view.flat_items.len(), 2);
    }

    #[test]
    fn delete_without_confirmation_when_disabled() {
        let config = AppConfig {
            general: GeneralConfig {
                confirm_delete: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let (_dir, mut app, _) = setup_app_as("alice", config);
        app.select_first();
        app.begin_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!contains_id(app.session.files(), "d1"));
        // selected file lived under d1, so the next file is shown
        assert_eq!(app.session.selected_id(), Some("b"));
        assert!(!app.content.is_text);
    }

    #[test]
    fn upload_reads_local_files() {
        let (dir, mut app, _) = setup_app();
        let local = dir.path().join("summary.md");
        fs::write(&local, "hello").unwrap();
        app.begin_upload(true);
        type_str(&mut app, &local.display().to_string());
        app.confirm_dialog();
        assert_eq!(app.mode, AppMode::Normal);
        let last = app.session.files().last().unwrap();
        assert_eq!(last.name(), "summary.md");
        assert!(last.content().unwrap().starts_with("# Uploaded File"));
    }

    #[test]
    fn upload_missing_file_shows_error() {
        let (dir, mut app, _) = setup_app();
        app.begin_upload(true);
        type_str(&mut app, &dir.path().join("ghost.md").display().to_string());
        app.confirm_dialog();
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::Error { .. })));
        assert!(!app.session.is_dirty());
    }

    #[test]
    fn commit_persists_to_store() {
        let (dir, mut app, id) = setup_app();
        app.toggle_visibility();
        app.commit();
        assert!(!app.session.is_dirty());
        assert_eq!(stored(&dir, &id).visibility, Visibility::Public);
    }

    #[test]
    fn discard_asks_then_restores() {
        let (_dir, mut app, _) = setup_app();
        app.select_last();
        app.begin_delete();
        app.confirm_dialog();
        app.begin_discard();
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::DiscardConfirm));
        app.confirm_dialog();
        assert!(contains_id(app.session.files(), "b"));
        assert!(!app.session.is_dirty());
    }

    #[test]
    fn discard_when_clean_is_noop() {
        let (_dir, mut app, _) = setup_app();
        app.begin_discard();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn activate_file_switches_content() {
        let (_dir, mut app, _) = setup_app();
        app.select_last();
        app.activate_selected();
        assert_eq!(app.session.selected_id(), Some("b"));
        assert!(!app.content.is_text);
    }

    #[test]
    fn activate_directory_toggles_expansion() {
        let (_dir, mut app, _) = setup_app();
        app.select_first();
        app.activate_selected();
        assert_eq!(app.tree_view.flat_items.len(), 2);
        app.activate_selected();
        assert_eq!(app.tree_view.flat_items.len(), 3);
    }

    #[test]
    fn rate_records_in_store() {
        let (dir, mut app, id) = setup_app_as("bob", AppConfig::default());
        app.rate(5);
        assert_eq!(app.session.user_rating(), Some(5));
        assert_eq!(stored(&dir, &id).rating_count, 1);
    }

    #[test]
    fn second_rating_shows_status() {
        let (dir, mut app, id) = setup_app_as("bob", AppConfig::default());
        app.rate(5);
        app.rate(2);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.user_rating(), Some(5));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("already rated"));
        let note = stored(&dir, &id);
        assert_eq!(note.rating_count, 1);
        assert!((note.rating - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn dialog_cursor_editing() {
        let (_dir, mut app, _) = setup_app();
        app.open_dialog(DialogKind::NewFolder { parent: None });
        type_str(&mut app, "aé");
        app.dialog_move_cursor_left();
        assert_eq!(app.dialog_state.cursor_position, 1);
        app.dialog_move_cursor_right();
        app.dialog_delete_char();
        assert_eq!(app.dialog_state.input, "a");
        app.dialog_cursor_home();
        app.dialog_delete_char();
        assert_eq!(app.dialog_state.input, "a");
    }

    #[test]
    fn clear_expired_status_removes_old() {
        let (_dir, mut app, _) = setup_app();
        app.set_status_message("fresh".to_string());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some((
            "old".to_string(),
            Instant::now() - std::time::Duration::from_secs(5),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn help_toggles() {
        let (_dir, mut app, _) = setup_app();
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Help);
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Normal);
    }
}
