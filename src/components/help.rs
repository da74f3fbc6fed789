use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// `(key, description)` pairs, grouped by category.
type KeyEntry = (&'static str, &'static str);

struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const NAVIGATION_KEYS: &[KeyEntry] = &[
    ("j / ↓", "Move down"),
    ("k / ↑", "Move up"),
    ("g / Home", "Jump to first item"),
    ("G / End", "Jump to last item"),
    ("Enter / l / →", "Open file / toggle folder"),
    ("h / ←", "Collapse folder / go to parent"),
    ("b", "Toggle file tree sidebar"),
];

const CONTENT_KEYS: &[KeyEntry] = &[
    ("n / PgDn", "Next page"),
    ("p / PgUp", "Previous page"),
];

const EDIT_KEYS: &[KeyEntry] = &[
    ("N", "New root folder"),
    ("A", "New folder in current folder"),
    ("U", "Upload files to root"),
    ("u", "Upload files to current folder"),
    ("r", "Rename item"),
    ("d", "Delete item"),
    ("v", "Toggle public / private"),
    ("c", "Commit pending changes"),
    ("X", "Discard pending changes"),
];

const ENGAGEMENT_KEYS: &[KeyEntry] = &[
    ("+", "Like / remove like"),
    ("-", "Dislike / remove dislike"),
    ("1 .. 5", "Rate the note"),
];

const GENERAL_KEYS: &[KeyEntry] = &[
    ("?", "Toggle this help overlay"),
    ("q", "Quit"),
    ("Ctrl+C", "Quit"),
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "File Tree",
        entries: NAVIGATION_KEYS,
    },
    KeyCategory {
        name: "Content Panel",
        entries: CONTENT_KEYS,
    },
    KeyCategory {
        name: "Editing (author only)",
        entries: EDIT_KEYS,
    },
    KeyCategory {
        name: "Reactions",
        entries: ENGAGEMENT_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled(" Keybinding Reference ", heading)),
            Line::from(""),
        ];

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(format!("── {} ", category.name), heading),
                Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
            ]));
            for (key, description) in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<18}", key),
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*description, Style::default().fg(self.theme.tree_file_fg)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }

    /// Total number of content lines, for clamping the scroll offset.
    pub fn total_lines() -> usize {
        // title, blank, footer, plus a header and a blank per category
        3 + CATEGORIES
            .iter()
            .map(|c| c.entries.len() + 2)
            .sum::<usize>()
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay_width = (area.width as f32 * 0.70).min(64.0) as u16;
        let overlay_height = (area.height as f32 * 0.80).min(40.0) as u16;
        let x = area.x + area.width.saturating_sub(overlay_width) / 2;
        let y = area.y + area.height.saturating_sub(overlay_height) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        Clear.render(overlay_area, buf);
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);
        if inner.height == 0 || inner.width < 2 {
            return;
        }

        let content_lines = self.build_content_lines();
        let visible_height = inner.height as usize;
        let scroll = self
            .scroll_offset
            .min(content_lines.len().saturating_sub(visible_height));

        for (i, line) in content_lines
            .iter()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            buf.set_line(inner.x + 1, inner.y + i as u16, line, inner.width - 2);
        }

        if content_lines.len() > visible_height {
            let total = content_lines.len();
            let ind_span = Span::styled(
                format!(" {}/{} ", scroll + 1, total),
                Style::default().fg(self.theme.dim_fg),
            );
            let ind_x = overlay_area.x
                + overlay_area
                    .width
                    .saturating_sub(ind_span.width() as u16 + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &ind_span, ind_span.width() as u16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_lines_match_total() {
        let theme = crate::theme::dark_theme();
        let overlay = HelpOverlay::new(&theme, 0);
        assert_eq!(overlay.build_content_lines().len(), HelpOverlay::total_lines());
    }

    #[test]
    fn all_categories_have_entries() {
        for cat in CATEGORIES {
            assert!(!cat.entries.is_empty(), "Category '{}' has no entries", cat.name);
        }
    }

    #[test]
    fn renders_commit_binding() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 60);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf.cell(pos).unwrap().symbol().to_string())
            .collect();
        assert!(text.contains("Commit pending changes"));
        assert!(text.contains("Help"));
    }

    #[test]
    fn oversized_scroll_is_clamped() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 10_000).render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf.cell(pos).unwrap().symbol().to_string())
            .collect();
        assert!(text.contains("Press ? or Esc"));
    }
}
