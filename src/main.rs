mod app;
mod auth;
mod components;
mod config;
mod content;
mod error;
mod event;
mod handler;
mod logging;
mod note;
mod store;
mod theme;
mod tui;
mod ui;
mod view;

use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::info;

use crate::app::App;
use crate::auth::Viewer;
use crate::config::{AppConfig, GeneralConfig, ThemeConfig, TreeConfig};
use crate::event::{Event, EventHandler};
use crate::note::{Note, Visibility};
use crate::store::{JsonNoteStore, NoteStore};
use crate::tui::{install_panic_hook, Tui};

/// Browse and edit Cognitia study notes in the terminal.
#[derive(Parser, Debug)]
#[command(name = "cnotes", version, about)]
struct Cli {
    /// Id of the note to open
    note_id: Option<String>,

    /// Directory holding the note documents
    #[arg(long)]
    store: Option<PathBuf>,

    /// User id to act as (decides edit rights)
    #[arg(long)]
    user: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color scheme: dark, light or custom
    #[arg(long)]
    theme: Option<String>,

    /// Use ASCII markers instead of nerd font icons
    #[arg(long)]
    no_icons: bool,

    /// Create an empty note with this title and open it
    #[arg(long, value_name = "TITLE", conflicts_with = "note_id")]
    new: Option<String>,

    /// Make the note created with --new public
    #[arg(long, requires = "new")]
    public: bool,

    /// Print stored notes and exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    /// Partial config built from the flags that override file settings.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                store_dir: self.store.as_ref().map(|p| p.display().to_string()),
                user_id: self.user.clone(),
                ..Default::default()
            },
            tree: TreeConfig {
                use_icons: self.no_icons.then_some(false),
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let mut store = JsonNoteStore::open(&config.store_dir())?;

    if cli.list {
        for summary in store.list_notes()? {
            println!(
                "{}  {:<32}  [{}]  {} file(s)  by {}",
                summary.id, summary.title, summary.visibility, summary.file_count, summary.author_id
            );
        }
        return Ok(());
    }

    let note_id = match (&cli.new, cli.note_id) {
        (Some(title), _) => {
            let visibility = if cli.public {
                Visibility::Public
            } else {
                Visibility::Private
            };
            let note = Note::new(title.trim(), config.user_id(), visibility);
            store.create_note(&note)?;
            info!(note_id = %note.id, "note created");
            note.id
        }
        (None, Some(id)) => id,
        (None, None) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a NOTE_ID is required (use --list to see stored notes, or --new TITLE)",
            )
            .exit(),
    };

    let viewer = Viewer::new(config.user_id());
    let mut app = App::new(Box::new(store), &note_id, &viewer, config)?;

    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(16));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick | Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
