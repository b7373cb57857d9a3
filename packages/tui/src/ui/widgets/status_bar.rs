use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::state::Tab;

/// One-line hint bar at the bottom of the screen. The key hints follow
/// the active tab.
pub struct StatusBar {
    active_tab: Tab,
    backend_reachable: bool,
}

impl StatusBar {
    pub fn new(active_tab: Tab, backend_reachable: bool) -> Self {
        Self {
            active_tab,
            backend_reachable,
        }
    }

    fn hints(&self) -> &'static str {
        match self.active_tab {
            Tab::Form => {
                "Tab: switch mode | Enter: next field | \u{2191}/\u{2193}: move | Shift+Enter: newline | Ctrl+Q: quit"
            }
            Tab::Chat => {
                "Tab: switch mode | Enter: send | \u{2191}/\u{2193}: scroll | Ctrl+L: clear chat | Esc: dismiss | Ctrl+Q: quit"
            }
        }
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            self.hints(),
            Style::default().fg(Color::DarkGray),
        )];
        if !self.backend_reachable {
            spans.push(Span::styled(
                "  \u{25cf} backend unreachable",
                Style::default().fg(Color::Red),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
