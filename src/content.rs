use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::note::FileNode;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Syntax name for a note file, picked from its extension. Notes without
/// a recognised extension are treated as Markdown.
pub fn detect_syntax_name(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "Markdown",
    };
    match ext.as_str() {
        "md" | "markdown" => "Markdown",
        "py" => "Python",
        "rs" => "Rust",
        "json" => "JSON",
        "yaml" | "yml" => "YAML",
        "html" | "htm" => "HTML",
        "js" | "jsx" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "tex" => "LaTeX",
        "c" | "h" => "C",
        "cpp" | "hpp" | "cc" => "C++",
        "java" => "Java",
        "sql" => "SQL",
        _ => "Plain Text",
    }
}

/// Load a theme from the built-in theme set by name, with fallback.
pub fn load_theme(theme_name: &str) -> Theme {
    let mut ts = ThemeSet::load_defaults();
    ts.themes
        .remove(theme_name)
        .or_else(|| ts.themes.remove(FALLBACK_THEME))
        .unwrap_or_default()
}

fn syntect_color_to_ratatui(c: syntect::highlighting::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Format bytes into a human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Syntax highlighter for file content shown in the content panel.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: load_theme(theme_name),
        }
    }

    /// Highlight `content` as the syntax implied by `file_name`, one
    /// `Line` per source line, each prefixed with its line number.
    pub fn highlight(&self, file_name: &str, content: &str) -> Vec<Line<'static>> {
        let ss = &self.syntax_set;
        let syntax = ss
            .find_syntax_by_name(detect_syntax_name(file_name))
            .unwrap_or_else(|| ss.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let total = content.lines().count();
        let width = total.max(1).to_string().len();

        LinesWithEndings::from(content)
            .enumerate()
            .map(|(i, raw)| {
                let mut spans: Vec<Span<'static>> = vec![Span::styled(
                    format!("{:>width$} │ ", i + 1, width = width),
                    Style::default().fg(Color::DarkGray),
                )];
                match highlighter.highlight_line(raw, ss) {
                    Ok(ranges) => {
                        for (style, text) in ranges {
                            let text = text.trim_end_matches(&['\n', '\r'][..]);
                            if text.is_empty() {
                                continue;
                            }
                            spans.push(Span::styled(
                                text.to_string(),
                                Style::default().fg(syntect_color_to_ratatui(style.foreground)),
                            ));
                        }
                    }
                    Err(_) => spans.push(Span::raw(raw.trim_end().to_string())),
                }
                Line::from(spans)
            })
            .collect()
    }
}

/// Summary shown for a file that has no text content (for example an
/// upload that has not been processed yet).
pub fn file_metadata_lines(node: &FileNode) -> Vec<Line<'static>> {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("(no text content)", Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Name:     ", label),
            Span::raw(node.name().to_string()),
        ]),
    ];
    if let FileNode::File(entry) = node {
        if let Some(size) = entry.size {
            lines.push(Line::from(vec![
                Span::styled("Size:     ", label),
                Span::raw(format_size(size)),
            ]));
        }
    }
    lines.push(Line::from(vec![
        Span::styled("Modified: ", label),
        Span::raw(node.updated_at().format("%Y-%m-%d %H:%M UTC").to_string()),
    ]));
    lines
}
