use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::note::Visibility;
use crate::theme::ThemeColors;

/// Status bar: note title, visibility, pending-change marker, page and
/// engagement counters. A transient status message replaces the whole bar.
pub struct StatusBarWidget<'a> {
    title: &'a str,
    theme: &'a ThemeColors,
    visibility: Visibility,
    dirty: bool,
    read_only: bool,
    page_label: Option<&'a str>,
    counters: Option<&'a str>,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(title: &'a str, visibility: Visibility, theme: &'a ThemeColors) -> Self {
        Self {
            title,
            theme,
            visibility,
            dirty: false,
            read_only: false,
            page_label: None,
            counters: None,
            status_message: None,
            is_error: false,
        }
    }

    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn page_label(mut self, label: &'a str) -> Self {
        self.page_label = Some(label);
        self
    }

    pub fn counters(mut self, counters: &'a str) -> Self {
        self.counters = Some(counters);
        self
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

/// Truncate to `max` chars, marking the cut with an ellipsis.
fn fit(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };
            let display = format!("{:<width$}", fit(msg, width), width = width);
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        let base = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);

        let (vis_label, vis_style) = match self.visibility {
            Visibility::Public => ("Public", base.fg(self.theme.success_fg)),
            Visibility::Private => ("Private", base.fg(self.theme.dim_fg)),
        };
        let (state_label, state_style) = if self.read_only {
            ("read-only", base.fg(self.theme.dim_fg))
        } else if self.dirty {
            (
                "● uncommitted",
                base.fg(self.theme.warning_fg).add_modifier(Modifier::BOLD),
            )
        } else {
            ("saved", base.fg(self.theme.success_fg))
        };

        let right: String = [self.page_label, self.counters]
            .iter()
            .flatten()
            .map(|s| format!(" {} ", s))
            .collect();
        let fixed = vis_label.len() + state_label.chars().count() + 6;
        let title_budget = width.saturating_sub(fixed + right.chars().count());
        let title = fit(self.title, title_budget);

        let mut spans = vec![
            Span::styled(format!(" {} ", title), base.add_modifier(Modifier::BOLD)),
            Span::styled(format!("[{}]", vis_label), vis_style),
            Span::styled(" ", base),
            Span::styled(state_label, state_style),
        ];
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = width.saturating_sub(used + right.chars().count());
        spans.push(Span::styled(" ".repeat(pad), base));
        spans.push(Span::styled(right, base.fg(self.theme.info_fg)));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
