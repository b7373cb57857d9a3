use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::state::{Notification, NotificationKind};

/// Banner rendered over the top-right corner of the screen. Success
/// banners auto-dismiss after 3s, errors after 5s; Esc dismisses early.
pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }

    /// Overlay area in the top-right corner of `area`.
    pub fn overlay_area(&self, area: Rect) -> Rect {
        let width = (self.notification.message.len() as u16 + 4)
            .min(area.width.saturating_sub(2))
            .max(20);
        let height = 3;
        Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + 1,
            width,
            height: height.min(area.height),
        }
    }
}

impl<'a> Widget for NotificationWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, color) = match self.notification.kind {
            NotificationKind::Success => ("Success", Color::Green),
            NotificationKind::Error => ("Error", Color::Red),
        };

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(color));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.notification.message.as_str())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
