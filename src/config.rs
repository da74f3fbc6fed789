//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--store`, `--user`, `--theme`, `--no-icons`)
//! 2. Explicit `--config FILE`
//! 3. `$COGNITIA_CONFIG` environment variable (path to config file)
//! 4. Project-local `.cognitia.toml` in the current working directory
//! 5. Global `~/.config/cognitia/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the note documents.
    pub store_dir: Option<String>,
    /// Identity of the person using the terminal; decides edit rights.
    pub user_id: Option<String>,
    /// Confirm before deleting a node.
    pub confirm_delete: Option<bool>,
    /// Confirm before discarding pending changes.
    pub confirm_discard: Option<bool>,
}

/// Content panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Syntax highlighting theme (syntect theme name).
    pub syntax_theme: Option<String>,
    /// Lines per content page.
    pub page_lines: Option<usize>,
}

/// Tree panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

/// Log file settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: Option<bool>,
    /// Filter directive, e.g. `"info"` or `"cognitia_notes=debug"`.
    pub level: Option<String>,
    pub file: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub preview_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub preview: PreviewConfig,
    pub tree: TreeConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default lines per content page.
pub const DEFAULT_PAGE_LINES: usize = 40;
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// User id used when neither config nor CLI names one.
pub const DEFAULT_USER_ID: &str = "local";

const APP_DIR: &str = "cognitia";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("COGNITIA_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".cognitia.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR).join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                store_dir: other.general.store_dir.clone().or(self.general.store_dir),
                user_id: other.general.user_id.clone().or(self.general.user_id),
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
                confirm_discard: other
                    .general
                    .confirm_discard
                    .or(self.general.confirm_discard),
            },
            preview: PreviewConfig {
                syntax_theme: other
                    .preview
                    .syntax_theme
                    .clone()
                    .or(self.preview.syntax_theme),
                page_lines: other.preview.page_lines.or(self.preview.page_lines),
            },
            tree: TreeConfig {
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
            logging: LoggingConfig {
                enabled: other.logging.enabled.or(self.logging.enabled),
                level: other.logging.level.clone().or(self.logging.level),
                file: other.logging.file.clone().or(self.logging.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Note store directory; `<data dir>/cognitia/notes` by default.
    pub fn store_dir(&self) -> PathBuf {
        match &self.general.store_dir {
            Some(dir) => PathBuf::from(dir),
            None => data_dir().join("notes"),
        }
    }

    pub fn user_id(&self) -> &str {
        self.general.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }

    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    pub fn confirm_discard(&self) -> bool {
        self.general.confirm_discard.unwrap_or(true)
    }

    /// Syntax highlighting theme name.
    pub fn syntax_theme_name(&self) -> &str {
        self.preview
            .syntax_theme
            .as_deref()
            .unwrap_or("base16-ocean.dark")
    }

    /// Lines per content page, never zero.
    pub fn page_lines(&self) -> usize {
        self.preview
            .page_lines
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_LINES)
    }

    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging.enabled.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log file path; `<data dir>/cognitia/cnotes.log` by default.
    pub fn log_file(&self) -> PathBuf {
        match &self.logging.file {
            Some(file) => PathBuf::from(file),
            None => data_dir().join("cnotes.log"),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

// ── Tests ────────────────────────────────────────────────────────────────────
