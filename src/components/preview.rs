use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::ContentView;
use crate::theme::ThemeColors;
use crate::view::Pager;

/// Content panel: the current page of the selected file.
pub struct ContentWidget<'a> {
    content: &'a ContentView,
    pager: &'a Pager,
    page_lines: usize,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ContentWidget<'a> {
    pub fn new(
        content: &'a ContentView,
        pager: &'a Pager,
        page_lines: usize,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            content,
            pager,
            page_lines,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Lines on the current page. Metadata views are never paged.
    fn page(&self) -> &'a [Line<'static>] {
        let lines = self.content.lines.as_slice();
        if !self.content.is_text {
            return lines;
        }
        &lines[self.pager.line_range(self.page_lines, lines.len())]
    }
}

impl<'a> Widget for ContentWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let placeholder = if self.content.lines.is_empty() {
            Some(if self.content.is_text {
                "(empty file)"
            } else {
                "No file selected"
            })
        } else {
            None
        };
        if let Some(msg) = placeholder {
            let line = Line::from(Span::styled(msg, Style::default().fg(self.theme.dim_fg)));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        for (i, line) in self.page().iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}
