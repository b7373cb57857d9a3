pub mod chat;
pub mod form;
pub mod widgets;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

use crate::state::{AppState, Tab};
use crate::ui::widgets::{NotificationWidget, StatusBar};

/// Top-level layout: tab bar, active tab body, status bar, and the
/// banner overlay on top.
pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tab_bar(frame, state, chunks[0]);

    match state.active_tab {
        Tab::Form => form::render_with_area(frame, state, chunks[1]),
        Tab::Chat => chat::render_with_area(frame, state, chunks[1]),
    }

    frame.render_widget(
        StatusBar::new(state.active_tab, state.backend_reachable),
        chunks[2],
    );

    if let Some(notification) = &state.notification {
        let widget = NotificationWidget::new(notification);
        let area = widget.overlay_area(frame.area());
        frame.render_widget(widget, area);
    }
}

fn render_tab_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let selected = match state.active_tab {
        Tab::Form => 0,
        Tab::Chat => 1,
    };

    let tabs = Tabs::new(vec!["Structured Form", "Chat with AI"])
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Log HCP Interaction")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(tabs, area);
}
