//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom hex overrides from
//! the `[theme.custom]` config table.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    /// Marks the file currently shown in the content panel.
    pub tree_open_fg: Color,

    pub preview_fg: Color,

    pub status_bg: Color,
    pub status_fg: Color,

    pub border_fg: Color,
    pub border_focused_fg: Color,

    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors, not configurable.
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using the Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),          // text
        tree_selected_bg: Color::Rgb(69, 71, 90),    // surface1
        tree_selected_fg: Color::Rgb(205, 214, 244), // text
        tree_dir_fg: Color::Rgb(137, 180, 250),      // blue
        tree_file_fg: Color::Rgb(205, 214, 244),     // text
        tree_open_fg: Color::Rgb(166, 227, 161),     // green

        preview_fg: Color::Rgb(205, 214, 244),

        status_bg: Color::Rgb(30, 30, 46), // base
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),           // surface2
        border_focused_fg: Color::Rgb(137, 180, 250), // blue

        dialog_bg: Color::Rgb(49, 50, 68), // surface0
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // red
        warning_fg: Color::Rgb(249, 226, 175), // yellow
        success_fg: Color::Rgb(166, 227, 161), // green
        info_fg: Color::Rgb(137, 180, 250),    // blue
        accent_fg: Color::Rgb(203, 166, 247),  // mauve
        dim_fg: Color::Rgb(108, 112, 134),     // overlay0
    }
}

/// Light theme using the Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),
        tree_selected_bg: Color::Rgb(204, 208, 218),
        tree_selected_fg: Color::Rgb(76, 79, 105),
        tree_dir_fg: Color::Rgb(30, 102, 245),
        tree_file_fg: Color::Rgb(76, 79, 105),
        tree_open_fg: Color::Rgb(64, 160, 43),

        preview_fg: Color::Rgb(76, 79, 105),

        status_bg: Color::Rgb(239, 241, 245),
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190),
        border_focused_fg: Color::Rgb(30, 102, 245),

        dialog_bg: Color::Rgb(230, 233, 239),
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),
        warning_fg: Color::Rgb(223, 142, 29),
        success_fg: Color::Rgb(64, 160, 43),
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Parse a hex color string like `"#aabbcc"`. Returns `None` for malformed
/// input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve the final `ThemeColors` from config.
///
/// `"light"` picks the light palette, `"custom"` starts from dark and
/// applies the overrides, anything else is dark.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex color overrides; malformed values keep the palette color.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let slots: [(&Option<String>, &mut Color); 11] = [
        (&custom.tree_fg, &mut theme.tree_fg),
        (&custom.tree_selected_bg, &mut theme.tree_selected_bg),
        (&custom.tree_selected_fg, &mut theme.tree_selected_fg),
        (&custom.tree_dir_fg, &mut theme.tree_dir_fg),
        (&custom.tree_file_fg, &mut theme.tree_file_fg),
        (&custom.preview_fg, &mut theme.preview_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
        (&custom.border_fg, &mut theme.border_fg),
        (&custom.dialog_bg, &mut theme.dialog_bg),
        (&custom.dialog_border_fg, &mut theme.dialog_border_fg),
    ];
    for (hex, slot) in slots {
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}
