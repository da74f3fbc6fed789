use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;
use crate::view::{FlatItem, TreeView};

/// Tree widget that renders the note's file tree with box-drawing characters.
pub struct TreeWidget<'a> {
    tree_view: &'a TreeView,
    theme: &'a ThemeColors,
    use_icons: bool,
    /// Id of the file shown in the content panel.
    open_id: Option<&'a str>,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_view: &'a TreeView, theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            tree_view,
            theme,
            use_icons,
            open_id: None,
            block: None,
        }
    }

    pub fn open_id(mut self, id: Option<&'a str>) -> Self {
        self.open_id = id;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Build the indentation prefix for `items[index]`.
    ///
    /// Each ancestor level draws a continuation bar unless that ancestor was
    /// the last of its siblings.
    fn build_prefix(items: &[FlatItem], index: usize) -> String {
        let item = &items[index];
        let mut prefix = String::new();

        for d in 0..item.depth {
            let ancestor_is_last = items[..index]
                .iter()
                .rev()
                .take_while(|it| it.depth >= d)
                .find(|it| it.depth == d)
                .map(|it| it.is_last_sibling)
                .unwrap_or(true);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }

        prefix.push_str(if item.is_last_sibling { "└─ " } else { "├─ " });
        prefix
    }

    fn item_indicator(&self, item: &FlatItem) -> &'static str {
        match (self.use_icons, item.is_dir, item.is_expanded) {
            (true, true, true) => "\u{f07c} ",
            (true, true, false) => "\u{f07b} ",
            (true, false, _) => Self::file_icon_by_ext(&item.name),
            (false, true, true) => "[-] ",
            (false, true, false) => "[+] ",
            (false, false, _) => "    ",
        }
    }

    /// Nerd Font icon for a note file based on its extension.
    fn file_icon_by_ext(name: &str) -> &'static str {
        let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "md" | "markdown" => "\u{e73e} ",
            "pdf" => "\u{f1c1} ",
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => "\u{f1c5} ",
            "doc" | "docx" => "\u{f1c2} ",
            "ppt" | "pptx" => "\u{f1c4} ",
            "zip" | "tar" | "gz" => "\u{f1c6} ",
            "py" | "rs" | "js" | "ts" | "c" | "cpp" | "java" => "\u{f1c9} ",
            _ => "\u{f15c} ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let items = &self.tree_view.flat_items;
        let visible_height = inner_area.height as usize;

        if items.is_empty() {
            if visible_height > 0 {
                let hint = Line::from(Span::styled(
                    "No files yet. N: new folder, U: upload",
                    Style::default().fg(self.theme.dim_fg),
                ));
                buf.set_line(inner_area.x, inner_area.y, &hint, inner_area.width);
            }
            return;
        }

        let visible = items
            .iter()
            .enumerate()
            .skip(self.tree_view.scroll_offset)
            .take(visible_height);

        for (row, (idx, item)) in visible.enumerate() {
            let y = inner_area.y + row as u16;
            let is_cursor = idx == self.tree_view.selected_index;
            let is_open = self.open_id == Some(item.id.as_str());

            let style = if is_cursor {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if is_open {
                Style::default()
                    .fg(self.theme.tree_open_fg)
                    .add_modifier(Modifier::BOLD)
            } else if item.is_dir {
                Style::default()
                    .fg(self.theme.tree_dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.tree_file_fg)
            };

            let text = format!(
                "{}{}{}",
                Self::build_prefix(items, idx),
                self.item_indicator(item),
                item.name
            );
            buf.set_line(inner_area.x, y, &Line::from(Span::styled(text, style)), inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::FileNode;
    use crate::theme;

    fn sample_view() -> TreeView {
        TreeView::new(&[
            FileNode::directory_with(
                "d1",
                "Week 1",
                vec![FileNode::file("a", "intro.md"), FileNode::file("b", "lab.md")],
            ),
            FileNode::file("c", "syllabus.md"),
        ])
    }

    fn rows(buf: &Buffer, area: Rect) -> Vec<String> {
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn renders_box_drawing_prefixes() {
        let view = sample_view();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&view, &tc, false).render(area, &mut buf);

        let lines = rows(&buf, area);
        assert_eq!(lines[0], "├─ [-] Week 1");
        assert_eq!(lines[1], "│  ├─     intro.md");
        assert_eq!(lines[2], "│  └─     lab.md");
        assert_eq!(lines[3], "└─     syllabus.md");
    }

    #[test]
    fn cursor_row_is_highlighted() {
        let mut view = sample_view();
        view.selected_index = 1;
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&view, &tc, false).render(area, &mut buf);
        assert_eq!(buf.cell((0, 1)).unwrap().bg, tc.tree_selected_bg);
        assert_ne!(buf.cell((0, 0)).unwrap().bg, tc.tree_selected_bg);
    }

    #[test]
    fn open_file_is_marked() {
        let view = sample_view();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&view, &tc, false)
            .open_id(Some("c"))
            .render(area, &mut buf);
        assert_eq!(buf.cell((0, 3)).unwrap().fg, tc.tree_open_fg);
    }

    #[test]
    fn empty_tree_shows_hint() {
        let view = TreeView::new(&[]);
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 50, 3);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&view, &tc, true).render(area, &mut buf);
        assert!(rows(&buf, area)[0].contains("No files yet"));
    }

    #[test]
    fn scroll_offset_skips_rows() {
        let mut view = sample_view();
        view.scroll_offset = 2;
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 2);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&view, &tc, false).render(area, &mut buf);
        assert!(rows(&buf, area)[0].ends_with("lab.md"));
    }
}
