use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::api::types::{humanize_field_name, is_displayable, ExtractedData};
use crate::chat::{ChatRole, ChatTurn};
use crate::input::InputBuffer;

/// Transcript widget: the conversation so far, anchored to the bottom,
/// plus a thinking line while a reply is pending.
pub struct ChatWidget<'a> {
    turns: &'a [ChatTurn],
    /// Lines scrolled up from the newest message.
    scroll_offset: usize,
    thinking: bool,
    show_timestamps: bool,
}

impl<'a> ChatWidget<'a> {
    pub fn new(turns: &'a [ChatTurn]) -> Self {
        Self {
            turns,
            scroll_offset: 0,
            thinking: false,
            show_timestamps: false,
        }
    }

    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }

    pub fn show_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    fn format_turn<'b>(&self, turn: &'b ChatTurn) -> Vec<Line<'b>> {
        let author_style = match turn.role {
            ChatRole::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ChatRole::Assistant => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        };

        let mut author_line = vec![Span::styled(turn.author_label(), author_style)];
        if self.show_timestamps {
            author_line.push(Span::styled(
                format!(" [{}]", turn.timestamp.format("%H:%M:%S")),
                Style::default().fg(Color::Gray),
            ));
        }

        let content_style = if turn.is_error() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };

        let mut lines = vec![Line::from(author_line)];
        for content_line in turn.content.lines() {
            lines.push(Line::from(Span::styled(content_line, content_style)));
        }
        lines.push(Line::from(""));
        lines
    }
}

impl<'a> Widget for ChatWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Conversation")
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for turn in self.turns {
            lines.extend(self.format_turn(turn));
        }
        if self.thinking {
            lines.push(Line::from(Span::styled(
                "AI is thinking...",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )));
        }

        // Anchor to the bottom; scroll offset walks back in time.
        // Paragraph scrolls in rendered rows, so count rows after
        // wrapping, not logical lines.
        let width = inner.width.max(1) as usize;
        let total: usize = lines
            .iter()
            .map(|line| {
                let w = line.width();
                if w == 0 {
                    1
                } else {
                    (w + width - 1) / width
                }
            })
            .sum();
        let height = inner.height as usize;
        let max_back = total.saturating_sub(height);
        let back = self.scroll_offset.min(max_back);
        let y = (max_back - back) as u16;

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((y, 0))
            .render(inner, buf);
    }
}

/// The chat input line.
pub struct InputWidget<'a> {
    buffer: &'a InputBuffer,
    sending: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(buffer: &'a InputBuffer) -> Self {
        Self {
            buffer,
            sending: false,
        }
    }

    pub fn sending(mut self, sending: bool) -> Self {
        self.sending = sending;
        self
    }
}

impl<'a> Widget for InputWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, border_color) = if self.sending {
            ("Sending...", Color::DarkGray)
        } else {
            ("", Color::White)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Keep the cursor in view with a horizontal window.
        let cursor_col = self.buffer.cursor_display_column();
        let skip = cursor_col.saturating_sub(inner.width.saturating_sub(1));

        let (text, style) = if self.buffer.is_empty() {
            (
                "Describe the interaction... (e.g., 'Met Dr. Smith today...')",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (self.buffer.content(), Style::default().fg(Color::White))
        };

        Paragraph::new(text)
            .style(style)
            .scroll((0, skip))
            .render(inner, buf);

        if !self.sending {
            let cursor_x = inner.x + (cursor_col - skip).min(inner.width.saturating_sub(1));
            let cell = &mut buf[(cursor_x, inner.y)];
            cell.set_style(cell.style().add_modifier(Modifier::REVERSED));
        }
    }
}

/// Running extracted-field panel shown under the chat once the backend
/// has pulled anything out of the conversation.
pub struct ExtractedPanel<'a> {
    data: &'a ExtractedData,
}

impl<'a> ExtractedPanel<'a> {
    pub fn new(data: &'a ExtractedData) -> Self {
        Self { data }
    }

    fn rows(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.data.iter().filter(|(_, value)| is_displayable(value))
    }

    /// Rows worth displaying, for layout sizing.
    pub fn visible_rows(&self) -> usize {
        self.rows().count()
    }

    fn display_value(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl<'a> Widget for ExtractedPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("AI has extracted so far")
            .title_style(Style::default().fg(Color::Yellow))
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .rows()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", humanize_field_name(name)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(Self::display_value(value)),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_text(buf: &Buffer, y: u16) -> String {
        let area = buf.area;
        (area.x..area.x + area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_bottom_anchor_accounts_for_soft_wrapping() {
        // Inner width 4: the unbroken content wraps to three rows.
        let turns = vec![ChatTurn::user("abcdefghij")];
        let area = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);

        ChatWidget::new(&turns).render(area, &mut buf);

        // Two inner rows; the newest wrapped rows win, so the tail of
        // the message is visible rather than its head.
        assert_eq!(row_text(&buf, 1), "│ij  │");
    }

    #[test]
    fn test_scroll_offset_walks_back_through_wrapped_rows() {
        let turns = vec![ChatTurn::user("abcdefghij")];
        let area = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);

        ChatWidget::new(&turns).scroll_offset(1).render(area, &mut buf);

        assert_eq!(row_text(&buf, 1), "│efgh│");
    }

    #[test]
    fn test_extracted_panel_counts_displayable_rows_only() {
        let mut data = ExtractedData::new();
        data.insert("hcp_name".to_string(), json!("Dr. Smith"));
        data.insert("sentiment".to_string(), json!(""));
        data.insert("products_discussed".to_string(), json!(null));

        let panel = ExtractedPanel::new(&data);
        assert_eq!(panel.visible_rows(), 1);
    }

    #[test]
    fn test_display_value_unquotes_strings() {
        assert_eq!(
            ExtractedPanel::display_value(&json!("Dr. Smith")),
            "Dr. Smith"
        );
        assert_eq!(ExtractedPanel::display_value(&json!(3)), "3");
    }
}
