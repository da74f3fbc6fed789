use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    /// Draw the frame and return the inner area, or `None` if too small.
    fn frame(&self, title: &str, width: u16, height: u16, area: Rect, buf: &mut Buffer) -> Option<Rect> {
        let rect = Self::centered_rect(width, height, area);
        Clear.render(rect, buf);
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);
        (inner.height > 0 && inner.width > 0).then_some(inner)
    }

    fn hint(&self, text: &'static str, inner: Rect, buf: &mut Buffer) {
        if inner.height < 2 {
            return;
        }
        let style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);
        let line = Line::from(Span::styled(text, style));
        buf.set_line(inner.x, inner.y + inner.height - 1, &line, inner.width);
    }

    fn render_input(&self, title: &str, area: Rect, buf: &mut Buffer) {
        let width = 56.min(area.width.saturating_sub(4));
        let Some(inner) = self.frame(title, width, 5, area, buf) else {
            return;
        };

        let input = self.dialog_state.input.as_str();
        let pos = self.dialog_state.cursor_position.min(input.len());
        let (before, rest) = input.split_at(pos);
        let mut rest_chars = rest.chars();
        let cursor = rest_chars
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after = rest_chars.as_str();

        // Keep the cursor visible by dropping chars from the left.
        let max_before = (inner.width as usize).saturating_sub(2);
        let before_count = before.chars().count();
        let before_display: String = before
            .chars()
            .skip(before_count.saturating_sub(max_before))
            .collect();

        let input_style = Style::default().fg(self.theme.preview_fg);
        let cursor_style = Style::default()
            .bg(self.theme.preview_fg)
            .fg(self.theme.dialog_bg)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(before_display, input_style),
            Span::styled(cursor, cursor_style),
            Span::styled(after.to_string(), input_style),
        ]);
        buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);
        self.hint("[Enter] Confirm  [Esc] Cancel", inner, buf);
    }

    fn render_confirm(&self, title: &str, question: &str, detail: &str, area: Rect, buf: &mut Buffer) {
        let content_width = question.chars().count().max(detail.chars().count()) as u16;
        let width = (content_width + 6).max(40).min(area.width.saturating_sub(4));
        let Some(inner) = self.frame(title, width, 7, area, buf) else {
            return;
        };

        let header = Line::from(Span::styled(
            question.to_string(),
            Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y, &header, inner.width);
        if inner.height > 2 {
            let line = Line::from(Span::styled(
                detail.to_string(),
                Style::default().fg(self.theme.preview_fg),
            ));
            buf.set_line(inner.x, inner.y + 2, &line, inner.width);
        }
        self.hint("[y] Yes  [n/Esc] Cancel", inner, buf);
    }

    fn render_error(&self, message: &str, area: Rect, buf: &mut Buffer) {
        let width = (message.chars().count() as u16 + 6)
            .max(30)
            .min(area.width.saturating_sub(4));
        let Some(inner) = self.frame("Error", width, 5, area, buf) else {
            return;
        };
        let line = Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(self.theme.error_fg),
        ));
        buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);
        self.hint("[Enter/Esc] Dismiss", inner, buf);
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let AppMode::Dialog(kind) = self.mode else {
            return;
        };

        match kind {
            DialogKind::NewFolder { parent: None } => {
                self.render_input("New Root Folder", area, buf);
            }
            DialogKind::NewFolder { parent: Some(_) } => {
                self.render_input("New Folder", area, buf);
            }
            DialogKind::Upload { .. } => {
                self.render_input("Upload Files (comma-separated paths)", area, buf);
            }
            DialogKind::Rename { .. } => {
                self.render_input("Rename", area, buf);
            }
            DialogKind::DeleteConfirm { name, .. } => {
                self.render_confirm(
                    "Delete Confirmation",
                    "Delete this item and everything inside it?",
                    &format!("  • {}", name),
                    area,
                    buf,
                );
            }
            DialogKind::DiscardConfirm => {
                self.render_confirm(
                    "Discard Changes",
                    "Discard all uncommitted changes?",
                    "The tree returns to the last committed state.",
                    area,
                    buf,
                );
            }
            DialogKind::Error { message } => {
                self.render_error(message, area, buf);
            }
        }
    }
}
