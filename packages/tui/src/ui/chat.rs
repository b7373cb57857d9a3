use ratatui::prelude::*;

use crate::state::AppState;
use crate::ui::widgets::{ChatWidget, ExtractedPanel, InputWidget};

/// Chat tab: transcript on top, input line below, and the running
/// extraction panel once the backend has pulled out any field.
pub fn render_with_area(frame: &mut Frame, state: &AppState, area: Rect) {
    let extracted = ExtractedPanel::new(state.store.extracted());
    let extracted_rows = extracted.visible_rows();

    let mut constraints = vec![Constraint::Min(5), Constraint::Length(3)];
    if extracted_rows > 0 {
        // Borders plus rows, capped so the transcript keeps room.
        let height = (extracted_rows as u16 + 2).min(8);
        constraints.push(Constraint::Length(height));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let transcript = ChatWidget::new(state.store.chat_history())
        .scroll_offset(state.scroll_offset)
        .thinking(state.store.awaiting_reply())
        .show_timestamps(state.show_timestamps);
    frame.render_widget(transcript, chunks[0]);

    let input = InputWidget::new(&state.chat_input).sending(state.store.is_chat_loading());
    frame.render_widget(input, chunks[1]);

    if extracted_rows > 0 {
        frame.render_widget(extracted, chunks[2]);
    }
}
