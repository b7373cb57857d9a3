use std::collections::HashMap;

use chrono::NaiveDate;
use crossterm::event::Event;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use tui_textarea::TextArea;

use crate::api::types::{InteractionDraft, Sentiment};

/// Inline message when the required fields are missing.
pub const VALIDATION_REQUIRED: &str = "HCP Name and Interaction Date are required.";
/// Inline message when the date does not parse.
pub const VALIDATION_DATE: &str = "Interaction Date must use the YYYY-MM-DD format.";

pub const IDX_HCP_NAME: usize = 0;
pub const IDX_DATE: usize = 1;
pub const IDX_PRODUCTS: usize = 2;
pub const IDX_POINTS: usize = 3;
pub const IDX_SENTIMENT: usize = 4;
pub const IDX_FOLLOW_UP: usize = 5;

/// The kinds of inputs backing a form field.
enum FieldValue {
    SingleLine(Input),
    MultiLine(TextArea<'static>),
    Selection { options: Vec<String>, selected: usize },
}

impl FieldValue {
    fn value(&self) -> String {
        match self {
            FieldValue::SingleLine(input) => input.value().to_string(),
            FieldValue::MultiLine(textarea) => textarea.lines().join("\n"),
            FieldValue::Selection { options, selected } => {
                options.get(*selected).cloned().unwrap_or_default()
            }
        }
    }
}

struct FormField {
    name: &'static str,
    label: &'static str,
    value: FieldValue,
    required: bool,
    placeholder: Option<&'static str>,
}

impl FormField {
    fn single_line(name: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            name,
            label,
            value: FieldValue::SingleLine(Input::default()),
            required,
            placeholder: None,
        }
    }

    fn with_value(mut self, value: String) -> Self {
        if let FieldValue::SingleLine(_) = self.value {
            self.value = FieldValue::SingleLine(Input::from(value));
        }
        self
    }

    fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    fn multi_line(name: &'static str, label: &'static str) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        Self {
            name,
            label,
            value: FieldValue::MultiLine(textarea),
            required: false,
            placeholder: None,
        }
    }

    fn selection(name: &'static str, label: &'static str, options: Vec<String>) -> Self {
        Self {
            name,
            label,
            value: FieldValue::Selection {
                options,
                selected: 0,
            },
            required: false,
            placeholder: None,
        }
    }
}

/// The structured-entry form: six interaction fields plus a submit
/// row. Holds field state, the focus position, and inline validation
/// errors.
pub struct InteractionForm {
    fields: Vec<FormField>,
    /// Focus position; `fields.len()` is the submit row.
    current: usize,
    validation_errors: HashMap<&'static str, &'static str>,
}

impl Default for InteractionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionForm {
    pub fn new() -> Self {
        let today = InteractionDraft::with_today().interaction_date;
        let sentiments = Sentiment::ALL.iter().map(|s| s.label().to_string()).collect();

        let fields = vec![
            FormField::single_line("hcp_name", "HCP Name", true)
                .with_placeholder("Dr. Jane Doe"),
            FormField::single_line("interaction_date", "Date of Interaction", true)
                .with_value(today),
            FormField::single_line("products_discussed", "Products Discussed", false)
                .with_placeholder("e.g., ProductA, ProductB"),
            FormField::multi_line("key_discussion_points", "Key Discussion Points"),
            FormField::selection("sentiment", "Sentiment", sentiments),
            FormField::multi_line("follow_up_actions", "Follow-up Actions"),
        ];

        Self {
            fields,
            current: 0,
            validation_errors: HashMap::new(),
        }
    }

    /// Reset every field to its default (date back to today) and clear
    /// focus and errors.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn value_at(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|field| field.value.value())
            .unwrap_or_default()
    }

    /// Assemble the draft from the current field values.
    pub fn draft(&self) -> InteractionDraft {
        let sentiment = match &self.fields[IDX_SENTIMENT].value {
            FieldValue::Selection { selected, .. } => Sentiment::ALL[*selected],
            _ => Sentiment::Unspecified,
        };
        InteractionDraft {
            hcp_name: self.value_at(IDX_HCP_NAME).trim().to_string(),
            interaction_date: self.value_at(IDX_DATE).trim().to_string(),
            products_discussed: self.value_at(IDX_PRODUCTS).trim().to_string(),
            key_discussion_points: self.value_at(IDX_POINTS).trim().to_string(),
            sentiment,
            follow_up_actions: self.value_at(IDX_FOLLOW_UP).trim().to_string(),
        }
    }

    /// Client-side check before any network call: the two required
    /// fields must be present and the date must parse.
    pub fn validate(&mut self) -> Result<(), &'static str> {
        self.validation_errors.clear();

        let mut missing = false;
        for index in [IDX_HCP_NAME, IDX_DATE] {
            if self.value_at(index).trim().is_empty() {
                self.validation_errors
                    .insert(self.fields[index].name, "This field is required");
                missing = true;
            }
        }
        if missing {
            return Err(VALIDATION_REQUIRED);
        }

        let date = self.value_at(IDX_DATE);
        if NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").is_err() {
            self.validation_errors
                .insert(self.fields[IDX_DATE].name, "Use YYYY-MM-DD");
            return Err(VALIDATION_DATE);
        }

        Ok(())
    }

    pub fn is_on_submit(&self) -> bool {
        self.current == self.fields.len()
    }

    pub fn current_is_multiline(&self) -> bool {
        matches!(
            self.fields.get(self.current).map(|f| &f.value),
            Some(FieldValue::MultiLine(_))
        )
    }

    pub fn next_field(&mut self) {
        if self.current < self.fields.len() {
            self.current += 1;
        }
    }

    pub fn previous_field(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Route a terminal event to the focused field. Returns whether the
    /// event was consumed.
    pub fn handle_input(&mut self, event: &Event) -> bool {
        let Some(field) = self.fields.get_mut(self.current) else {
            return false;
        };
        let name = field.name;

        let handled = match &mut field.value {
            FieldValue::SingleLine(input) => input.handle_event(event).is_some(),
            FieldValue::MultiLine(textarea) => {
                if let Event::Key(key) = event {
                    // Enter is form navigation; Shift+Enter inserts via
                    // insert_newline instead.
                    if key.code == crossterm::event::KeyCode::Enter {
                        return false;
                    }
                    match convert_key(key.code) {
                        Some(code) => {
                            let key = ratatui::crossterm::event::KeyEvent::new(
                                code,
                                ratatui::crossterm::event::KeyModifiers::empty(),
                            );
                            textarea.input(key)
                        }
                        None => false,
                    }
                } else {
                    false
                }
            }
            // Left/Right cycle the radio options; Up/Down stay free for
            // field navigation.
            FieldValue::Selection { options, selected } => {
                if let Event::Key(key) = event {
                    match key.code {
                        crossterm::event::KeyCode::Left => {
                            if *selected > 0 {
                                *selected -= 1;
                                true
                            } else {
                                false
                            }
                        }
                        crossterm::event::KeyCode::Right
                        | crossterm::event::KeyCode::Char(' ') => {
                            if *selected < options.len().saturating_sub(1) {
                                *selected += 1;
                                true
                            } else {
                                false
                            }
                        }
                        _ => false,
                    }
                } else {
                    false
                }
            }
        };

        if handled {
            self.validation_errors.remove(name);
        }
        handled
    }

    /// Shift+Enter in a multiline field.
    pub fn insert_newline(&mut self) -> bool {
        let Some(field) = self.fields.get_mut(self.current) else {
            return false;
        };
        match &mut field.value {
            FieldValue::MultiLine(textarea) => {
                let key = ratatui::crossterm::event::KeyEvent::new(
                    ratatui::crossterm::event::KeyCode::Enter,
                    ratatui::crossterm::event::KeyModifiers::empty(),
                );
                textarea.input(key);
                true
            }
            _ => false,
        }
    }

    // --- rendering ---

    pub fn render(&self, frame: &mut Frame, area: Rect, submitting: bool) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title("Log Interaction - Structured Form")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Heights per row, the submit row included as the last entry.
        let mut heights: Vec<u16> = self.fields.iter().map(|f| self.field_height(f)).collect();
        heights.push(3);

        // Window the rows around the focused one so it is always
        // visible on short terminals.
        let available = inner.height;
        let mut total = 0u16;
        let mut end = self.current;
        for (i, height) in heights.iter().enumerate().skip(self.current) {
            if total + height <= available {
                total += height;
                end = i + 1;
            } else {
                break;
            }
        }
        let mut start = self.current;
        while start > 0 {
            let height = heights[start - 1];
            if total + height <= available {
                total += height;
                start -= 1;
            } else {
                break;
            }
        }

        let constraints: Vec<Constraint> = (start..end)
            .map(|i| Constraint::Length(heights[i]))
            .collect();
        if constraints.is_empty() {
            return;
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (slot, index) in (start..end).enumerate() {
            if index == self.fields.len() {
                self.render_submit_row(frame, rows[slot], submitting);
            } else {
                self.render_field(frame, rows[slot], index);
            }
        }
    }

    fn field_height(&self, field: &FormField) -> u16 {
        match &field.value {
            FieldValue::SingleLine(_) => 5,
            FieldValue::MultiLine(textarea) => {
                let lines = textarea.lines();
                let count = if lines.is_empty() || (lines.len() == 1 && lines[0].is_empty()) {
                    1
                } else {
                    lines.len()
                };
                1 + (count as u16).min(6) + 2 + 1
            }
            FieldValue::Selection { options, .. } => 1 + options.len() as u16 + 2 + 1,
        }
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, index: usize) {
        let field = &self.fields[index];
        let is_current = index == self.current;

        let required_marker = if field.required { " *" } else { "" };
        let label_style = if is_current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let border_style = if is_current {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        let input_height = self.field_height(field) - 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(input_height),
                Constraint::Length(1),
            ])
            .split(area);
        let (label_area, input_area, error_area) = (chunks[0], chunks[1], chunks[2]);

        let label = format!("{}{}:", field.label, required_marker);
        frame.render_widget(Paragraph::new(label).style(label_style), label_area);

        match &field.value {
            FieldValue::SingleLine(input) => {
                let width = input_area.width.max(3).saturating_sub(2) as usize;
                let scroll = input.visual_scroll(width);
                let display = if input.value().is_empty() {
                    field.placeholder.unwrap_or_default()
                } else {
                    input.value()
                };
                let style = if input.value().is_empty() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };

                let paragraph = Paragraph::new(display)
                    .style(style)
                    .scroll((0, scroll as u16))
                    .block(Block::default().borders(Borders::ALL).border_style(border_style));
                frame.render_widget(paragraph, input_area);

                if is_current {
                    let cursor_x = input.visual_cursor().max(scroll) - scroll;
                    frame.set_cursor_position((
                        input_area.x + 1 + cursor_x as u16,
                        input_area.y + 1,
                    ));
                }
            }
            FieldValue::MultiLine(textarea) => {
                let block = Block::default().borders(Borders::ALL).border_style(border_style);
                let inner = block.inner(input_area);
                frame.render_widget(block, input_area);
                frame.render_widget(textarea, inner);
            }
            FieldValue::Selection { options, selected } => {
                let block = Block::default().borders(Borders::ALL).border_style(border_style);
                let inner = block.inner(input_area);
                frame.render_widget(block, input_area);

                let lines: Vec<Line> = options
                    .iter()
                    .enumerate()
                    .map(|(i, option)| {
                        let (symbol, style) = if i == *selected {
                            ("●", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                        } else {
                            ("○", Style::default().fg(Color::White))
                        };
                        Line::from(vec![
                            Span::styled(format!("{} ", symbol), style),
                            Span::styled(option.clone(), style),
                        ])
                    })
                    .collect();
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }

        if let Some(error) = self.validation_errors.get(field.name) {
            let paragraph =
                Paragraph::new(format!("✗ {}", error)).style(Style::default().fg(Color::Red));
            frame.render_widget(paragraph, error_area);
        }
    }

    fn render_submit_row(&self, frame: &mut Frame, area: Rect, submitting: bool) {
        let is_current = self.is_on_submit();
        let text = if submitting {
            "Submitting..."
        } else {
            "[ Submit Interaction ]"
        };
        let style = match (is_current, submitting) {
            (_, true) => Style::default().fg(Color::DarkGray),
            (true, false) => Style::default().fg(Color::Black).bg(Color::Green),
            (false, false) => Style::default().fg(Color::Green),
        };

        let paragraph = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(
                if is_current {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Gray)
                },
            ));
        frame.render_widget(paragraph, area);
    }
}

/// Map crossterm key codes to ratatui's re-exported crossterm for
/// tui-textarea (the two crates pin different crossterm versions).
fn convert_key(
    code: crossterm::event::KeyCode,
) -> Option<ratatui::crossterm::event::KeyCode> {
    use ratatui::crossterm::event::KeyCode as R;
    match code {
        crossterm::event::KeyCode::Backspace => Some(R::Backspace),
        crossterm::event::KeyCode::Delete => Some(R::Delete),
        crossterm::event::KeyCode::Left => Some(R::Left),
        crossterm::event::KeyCode::Right => Some(R::Right),
        crossterm::event::KeyCode::Up => Some(R::Up),
        crossterm::event::KeyCode::Down => Some(R::Down),
        crossterm::event::KeyCode::Home => Some(R::Home),
        crossterm::event::KeyCode::End => Some(R::End),
        crossterm::event::KeyCode::Char(c) => Some(R::Char(c)),
        _ => None,
    }
}
