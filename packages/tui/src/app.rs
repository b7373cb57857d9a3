use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::actions;
use crate::api::client::{ApiClient, CHAT_SEND_FAILURE};
use crate::api::types::{ChatResponse, InteractionRecord};
use crate::api::ApiError;
use crate::events::{AppEvent, EventHandler};
use crate::state::{AppState, CtrlCAction, Tab};
use crate::ui;

/// Startup knobs handed down from the CLI.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub api_url: String,
    pub tick_rate_ms: u64,
    pub show_timestamps: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            api_url: ApiClient::DEFAULT_BASE_URL.to_string(),
            tick_rate_ms: 250,
            show_timestamps: false,
        }
    }
}

/// The interaction logger application: owns the view state and the
/// backend client, and drives both from the event loop.
pub struct App {
    pub state: AppState,
    client: ApiClient,
    should_quit: bool,
    tick_rate_ms: u64,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        Self {
            state: AppState::new(options.show_timestamps),
            client: ApiClient::new(options.api_url),
            should_quit: false,
            tick_rate_ms: options.tick_rate_ms,
        }
    }

    /// Main loop: draw, wait for the next event, apply it.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut events = EventHandler::new(self.tick_rate_ms);

        // Startup reachability probe; resolves through the event
        // channel like any request.
        let sender = events.sender();
        let client = self.client.clone();
        tokio::spawn(async move {
            let healthy = client.health_check().await.unwrap_or(false);
            let _ = sender.send(AppEvent::Health(healthy));
        });

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            match events.next().await {
                Some(AppEvent::Key(key)) => self.handle_key(key, &events.sender()),
                Some(AppEvent::Tick) => self.state.expire_notification(Instant::now()),
                Some(AppEvent::Health(healthy)) => self.apply_health(healthy),
                Some(AppEvent::FormResult(outcome)) => self.apply_form_result(outcome),
                Some(AppEvent::ChatResult(outcome)) => self.apply_chat_result(outcome),
                None => break,
            }
        }

        Ok(())
    }

    fn apply_health(&mut self, healthy: bool) {
        self.state.backend_reachable = healthy;
        if !healthy {
            debug!(url = self.client.base_url(), "backend unreachable");
            self.state
                .notify_error(format!("Cannot reach backend at {}", self.client.base_url()));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, sender: &UnboundedSender<AppEvent>) {
        // Global bindings first.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    match self.state.handle_ctrl_c_key() {
                        CtrlCAction::QuitApplication => self.should_quit = true,
                        CtrlCAction::ClearInput => self.state.chat_input.clear(),
                    }
                    return;
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('l') if self.state.active_tab == Tab::Chat => {
                    self.state.store.clear_chat();
                    self.state.scroll_to_bottom();
                    return;
                }
                _ => {}
            }
        }

        if key.code == KeyCode::Tab {
            // With chat text in progress, leave Tab alone so a switch
            // never eats a half-typed message by surprise.
            if self.state.active_tab == Tab::Chat && !self.state.chat_input.is_empty() {
                return;
            }
            self.state.toggle_tab();
            return;
        }

        match self.state.active_tab {
            Tab::Form => self.handle_form_key(key, sender),
            Tab::Chat => self.handle_chat_key(key, sender),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, sender: &UnboundedSender<AppEvent>) {
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.state.form.insert_newline();
            }
            KeyCode::Enter => {
                if self.state.form.is_on_submit() {
                    self.submit_form(sender);
                } else {
                    self.state.form.next_field();
                }
            }
            KeyCode::Up | KeyCode::BackTab => self.state.form.previous_field(),
            KeyCode::Down => self.state.form.next_field(),
            KeyCode::Esc => {
                self.state.dismiss_notification();
            }
            _ => {
                self.state.form.handle_input(&Event::Key(key));
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent, sender: &UnboundedSender<AppEvent>) {
        match key.code {
            KeyCode::Enter => self.send_chat(sender),
            KeyCode::Up => self.state.scroll_up(),
            KeyCode::Down => self.state.scroll_down(),
            KeyCode::Esc => {
                // Banner first, then the input line.
                if !self.state.dismiss_notification() {
                    self.state.chat_input.clear();
                }
            }
            KeyCode::Backspace => {
                self.state.chat_input.backspace();
            }
            KeyCode::Delete => {
                self.state.chat_input.delete_char();
            }
            KeyCode::Left => {
                self.state.chat_input.move_left();
            }
            KeyCode::Right => {
                self.state.chat_input.move_right();
            }
            KeyCode::Home => self.state.chat_input.move_to_start(),
            KeyCode::End => self.state.chat_input.move_to_end(),
            KeyCode::Char(ch) => self.state.chat_input.insert_char(ch),
            _ => {}
        }
    }

    /// Validate locally, then hand the draft to a spawned request task.
    /// Validation failures surface as a banner and never leave the
    /// client.
    fn submit_form(&mut self, sender: &UnboundedSender<AppEvent>) {
        if self.state.store.is_form_loading() {
            return;
        }
        if let Err(message) = self.state.form.validate() {
            self.state.notify_error(message);
            return;
        }

        let draft = self.state.form.draft();
        actions::begin_form_submit(&mut self.state.store);

        let client = self.client.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let outcome = client.log_interaction_form(&draft).await;
            let _ = sender.send(AppEvent::FormResult(outcome));
        });
    }

    fn apply_form_result(&mut self, outcome: Result<InteractionRecord, ApiError>) {
        match actions::finish_form_submit(&mut self.state.store, outcome) {
            Ok(_) => {
                self.state.form.reset();
                self.state.notify_success("Interaction logged successfully!");
            }
            Err(err) => self.state.notify_error(err.message()),
        }
    }

    /// Dispatch the chat input. Whitespace-only input is left untouched;
    /// otherwise the input line is cleared no matter how the request
    /// ends.
    fn send_chat(&mut self, sender: &UnboundedSender<AppEvent>) {
        if self.state.store.is_chat_loading() {
            return;
        }
        if self.state.chat_input.content().trim().is_empty() {
            return;
        }

        let message = self.state.chat_input.take_trimmed();
        let request = actions::begin_chat_send(&mut self.state.store, message);
        self.state.scroll_to_bottom();

        let client = self.client.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let outcome = client.log_interaction_chat(&request).await;
            let _ = sender.send(AppEvent::ChatResult(outcome));
        });
    }

    fn apply_chat_result(&mut self, outcome: Result<ChatResponse, ApiError>) {
        if let Err(err) = actions::finish_chat_send(&mut self.state.store, outcome) {
            self.state.notify_error(err.message_or(CHAT_SEND_FAILURE));
        }
        self.state.scroll_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotificationKind;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn test_app() -> (App, UnboundedSender<AppEvent>) {
        let app = App::new(AppOptions {
            // Nothing listens here; requests fail fast.
            api_url: "http://127.0.0.1:1/api".to_string(),
            ..AppOptions::default()
        });
        let (sender, _receiver) = mpsc::unbounded_channel();
        (app, sender)
    }

    #[tokio::test]
    async fn test_tab_key_switches_modes() {
        let (mut app, sender) = test_app();
        assert_eq!(app.state.active_tab, Tab::Form);

        app.handle_key(key(KeyCode::Tab), &sender);
        assert_eq!(app.state.active_tab, Tab::Chat);

        // A half-typed chat message pins the chat tab.
        app.state.chat_input.insert_char('h');
        app.handle_key(key(KeyCode::Tab), &sender);
        assert_eq!(app.state.active_tab, Tab::Chat);

        app.state.chat_input.clear();
        app.handle_key(key(KeyCode::Tab), &sender);
        assert_eq!(app.state.active_tab, Tab::Form);
    }

    #[tokio::test]
    async fn test_ctrl_q_quits() {
        let (mut app, sender) = test_app();
        app.handle_key(ctrl('q'), &sender);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_submit_with_invalid_form_banners_without_network() {
        let (mut app, sender) = test_app();

        // Walk to the submit row with the HCP name still empty.
        for _ in 0..6 {
            app.handle_key(key(KeyCode::Down), &sender);
        }
        assert!(app.state.form.is_on_submit());
        app.handle_key(key(KeyCode::Enter), &sender);

        let notification = app.state.notification.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        // No request left the client.
        assert!(!app.state.store.is_form_loading());
    }

    #[tokio::test]
    async fn test_chat_enter_ignores_whitespace_only_input() {
        let (mut app, sender) = test_app();
        app.handle_key(key(KeyCode::Tab), &sender);

        app.state.chat_input.insert_str("   ");
        app.handle_key(key(KeyCode::Enter), &sender);

        // Untouched: no echo, no in-flight request, input preserved.
        assert!(app.state.store.chat_history().is_empty());
        assert!(!app.state.store.is_chat_loading());
        assert_eq!(app.state.chat_input.content(), "   ");
    }

    #[tokio::test]
    async fn test_chat_enter_dispatches_and_clears_input() {
        let (mut app, sender) = test_app();
        app.handle_key(key(KeyCode::Tab), &sender);

        app.state.chat_input.insert_str("Met Dr. Smith today");
        app.handle_key(key(KeyCode::Enter), &sender);

        assert!(app.state.chat_input.is_empty());
        assert!(app.state.store.is_chat_loading());
        assert_eq!(app.state.store.chat_history().len(), 1);
    }

    #[tokio::test]
    async fn test_enter_while_chat_request_in_flight_is_ignored() {
        let (mut app, sender) = test_app();
        app.handle_key(key(KeyCode::Tab), &sender);

        app.state.chat_input.insert_str("first");
        app.handle_key(key(KeyCode::Enter), &sender);
        app.state.chat_input.insert_str("second");
        app.handle_key(key(KeyCode::Enter), &sender);

        // The second send is dropped while the first is pending.
        assert_eq!(app.state.store.chat_history().len(), 1);
        assert_eq!(app.state.chat_input.content(), "second");
    }

    #[tokio::test]
    async fn test_ctrl_l_clears_chat_only_on_chat_tab() {
        let (mut app, sender) = test_app();
        app.state.store.push_user_turn("hello");

        app.handle_key(ctrl('l'), &sender);
        assert_eq!(app.state.store.chat_history().len(), 1);

        app.handle_key(key(KeyCode::Tab), &sender);
        app.handle_key(ctrl('l'), &sender);
        assert!(app.state.store.chat_history().is_empty());
    }

    #[tokio::test]
    async fn test_esc_dismisses_banner_before_clearing_input() {
        let (mut app, sender) = test_app();
        app.handle_key(key(KeyCode::Tab), &sender);
        app.state.chat_input.insert_str("draft");
        app.state.notify_error("boom");

        app.handle_key(key(KeyCode::Esc), &sender);
        assert!(app.state.notification.is_none());
        assert_eq!(app.state.chat_input.content(), "draft");

        app.handle_key(key(KeyCode::Esc), &sender);
        assert!(app.state.chat_input.is_empty());
    }

    #[tokio::test]
    async fn test_failed_form_result_banners_and_keeps_form() {
        let (mut app, _sender) = test_app();

        app.state.store.begin_form_request();
        app.apply_form_result(Err(ApiError::Server {
            status: 503,
            detail: "Database connection unavailable.".to_string(),
        }));

        let notification = app.state.notification.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Database connection unavailable.");
        assert!(!app.state.store.is_form_loading());
    }

    #[tokio::test]
    async fn test_successful_form_result_resets_form() {
        let (mut app, sender) = test_app();
        app.handle_key(key(KeyCode::Char('D')), &sender);
        assert_eq!(app.state.form.draft().hcp_name, "D");

        app.state.store.begin_form_request();
        let record: InteractionRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "hcp_name": "D",
            "interaction_date": "2024-01-01",
        }))
        .unwrap();
        app.apply_form_result(Ok(record));

        assert!(app.state.form.draft().hcp_name.is_empty());
        let notification = app.state.notification.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(app.state.store.interactions().len(), 1);
    }
}
