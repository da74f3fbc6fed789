use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::help::HelpOverlay;
use crate::components::preview::ContentWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::note::Reaction;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    app.clear_expired_status();
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    if app.sidebar_collapsed {
        render_content(app, frame, rows[0]);
    } else {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(rows[0]);
        render_tree(app, frame, cols[0]);
        render_content(app, frame, cols[1]);
    }

    render_status_bar(app, frame, rows[1]);

    match app.mode {
        AppMode::Dialog(_) => {
            frame.render_widget(DialogWidget::new(&app.mode, &app.dialog_state, &app.theme), area);
        }
        AppMode::Help => {
            frame.render_widget(HelpOverlay::new(&app.theme, app.help_scroll), area);
        }
        AppMode::Normal => {}
    }
}

fn render_tree(app: &mut App, frame: &mut Frame, area: Rect) {
    // Keep the cursor row visible inside the border.
    let visible_height = area.height.saturating_sub(2) as usize;
    app.tree_view.update_scroll(visible_height);

    let block = Block::default()
        .title(" Files ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    let widget = TreeWidget::new(&app.tree_view, &app.theme, app.config.use_icons())
        .open_id(app.session.selected_id())
        .block(block);
    frame.render_widget(widget, area);
}

fn render_content(app: &App, frame: &mut Frame, area: Rect) {
    let title = match app.shown_file() {
        Some(node) if app.content.is_text => {
            format!(" {} ── {} ", node.name(), app.session.pager().label())
        }
        Some(node) => format!(" {} ", node.name()),
        None => " Content ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focused_fg))
        .style(Style::default().fg(app.theme.preview_fg));
    let widget = ContentWidget::new(
        &app.content,
        app.session.pager(),
        app.session.page_lines(),
        &app.theme,
    )
    .block(block);
    frame.render_widget(widget, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let note = app.session.note();
    let counters = engagement_label(app);
    let page_label = app.session.pager().label();

    let mut widget = StatusBarWidget::new(&note.title, app.session.visibility(), &app.theme)
        .dirty(app.session.is_dirty())
        .read_only(!app.can_edit())
        .counters(&counters);
    if app.content.is_text {
        widget = widget.page_label(&page_label);
    }
    if let Some((ref msg, _)) = app.status_message {
        widget = widget.status_message(msg, false);
    }
    frame.render_widget(widget, area);
}

/// Likes, dislikes, views and rating, marking the viewer's own reaction.
fn engagement_label(app: &App) -> String {
    let note = app.session.note();
    let (like_mark, dislike_mark) = match app.session.reaction() {
        Reaction::Liked => ("*", ""),
        Reaction::Disliked => ("", "*"),
        Reaction::None => ("", ""),
    };
    let mut label = format!(
        "+{}{} -{}{}  views {}  ★ {:.1} ({})",
        note.like_count,
        like_mark,
        note.dislike_count,
        dislike_mark,
        note.view_count,
        note.rating,
        note.rating_count
    );
    if let Some(stars) = app.session.user_rating() {
        label.push_str(&format!("  you {}★", stars));
    }
    label
}
