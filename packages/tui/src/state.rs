use std::time::{Duration, Instant};

use crate::input::InputBuffer;
use crate::store::InteractionStore;
use crate::ui::widgets::form::InteractionForm;

/// How long a success banner stays up.
const SUCCESS_TTL: Duration = Duration::from_secs(3);
/// How long an error banner stays up.
const ERROR_TTL: Duration = Duration::from_secs(5);

/// The two input modes of the logging screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Form,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient banner with its dismissal deadline. The deadline lives
/// on the banner itself and is checked on the event-loop tick, so no
/// detached timer can fire after the banner is gone.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    deadline: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
            deadline: Instant::now() + SUCCESS_TTL,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            deadline: Instant::now() + ERROR_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Action resulting from a Ctrl+C press.
#[derive(Debug, Clone, PartialEq)]
pub enum CtrlCAction {
    /// Clear the chat input (or arm the quit timer on empty input).
    ClearInput,
    /// Second press within the timeout: quit.
    QuitApplication,
}

/// All view state: the interaction store plus per-tab local state.
pub struct AppState {
    pub store: InteractionStore,
    pub active_tab: Tab,
    pub chat_input: InputBuffer,
    pub form: InteractionForm,
    pub scroll_offset: usize,
    pub notification: Option<Notification>,
    pub show_timestamps: bool,
    /// Result of the startup reachability probe; optimistic until the
    /// probe resolves.
    pub backend_reachable: bool,
    /// Track last Ctrl+C press for double-press quit detection.
    last_ctrl_c_time: Option<Instant>,
    ctrl_c_timeout: Duration,
}

impl AppState {
    pub fn new(show_timestamps: bool) -> Self {
        Self {
            store: InteractionStore::new(),
            active_tab: Tab::Form,
            chat_input: InputBuffer::new(),
            form: InteractionForm::new(),
            scroll_offset: 0,
            notification: None,
            show_timestamps,
            backend_reachable: true,
            last_ctrl_c_time: None,
            ctrl_c_timeout: Duration::from_millis(1000),
        }
    }

    pub fn toggle_tab(&mut self) {
        self.active_tab = match self.active_tab {
            Tab::Form => Tab::Chat,
            Tab::Chat => Tab::Form,
        };
    }

    // --- transcript scrolling ---

    pub fn scroll_up(&mut self) {
        // Loose cap; the widget clamps to the real line count.
        let max = self.store.chat_history().len().saturating_mul(8);
        if self.scroll_offset < max {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    // --- banners ---

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::success(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    /// Drop the banner; dismissing an error banner also clears the
    /// store error it mirrored.
    pub fn dismiss_notification(&mut self) -> bool {
        match self.notification.take() {
            Some(notification) => {
                if notification.kind == NotificationKind::Error {
                    self.store.reset_error();
                }
                true
            }
            None => false,
        }
    }

    /// Called on every tick; auto-dismisses an expired banner.
    pub fn expire_notification(&mut self, now: Instant) {
        let expired = self
            .notification
            .as_ref()
            .map(|n| n.is_expired(now))
            .unwrap_or(false);
        if expired {
            self.dismiss_notification();
        }
    }

    // --- quit handling ---

    /// Ctrl+C: with chat input text, clear it; on empty input, two
    /// presses within the timeout quit.
    pub fn handle_ctrl_c_key(&mut self) -> CtrlCAction {
        let now = Instant::now();

        let input_is_empty = self.active_tab != Tab::Chat || self.chat_input.is_empty();
        if !input_is_empty {
            self.last_ctrl_c_time = None;
            return CtrlCAction::ClearInput;
        }

        if let Some(last_time) = self.last_ctrl_c_time {
            if now.duration_since(last_time) < self.ctrl_c_timeout {
                self.last_ctrl_c_time = None;
                return CtrlCAction::QuitApplication;
            }
        }

        self.last_ctrl_c_time = Some(now);
        CtrlCAction::ClearInput
    }
}
