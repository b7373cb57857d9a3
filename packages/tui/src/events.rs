use crossterm::event::{self, Event, KeyEvent};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::client::ApiError;
use crate::api::types::{ChatResponse, InteractionRecord};

/// Events driving the application loop: terminal input, the periodic
/// tick, and resolutions of spawned backend requests.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// Startup reachability probe resolved.
    Health(bool),
    /// A form submission resolved.
    FormResult(Result<InteractionRecord, ApiError>),
    /// A chat send resolved.
    ChatResult(Result<ChatResponse, ApiError>),
}

/// Event pump: a background task polls the terminal and emits ticks;
/// request tasks push their outcomes through the same channel.
pub struct EventHandler {
    sender: mpsc::UnboundedSender<AppEvent>,
    receiver: mpsc::UnboundedReceiver<AppEvent>,
    handler: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::unbounded_channel();
        let _sender = sender.clone();

        let handler = tokio::spawn(async move {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or_else(|| Duration::from_secs(0));

                if let Ok(has_event) = event::poll(timeout) {
                    if has_event {
                        if let Ok(Event::Key(key)) = event::read() {
                            if key.kind == event::KeyEventKind::Press {
                                let _ = _sender.send(AppEvent::Key(key));
                            }
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    let _ = _sender.send(AppEvent::Tick);
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.receiver.recv().await
    }

    /// Sender handed to spawned request tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
