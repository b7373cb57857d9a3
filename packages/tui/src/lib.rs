//! Hcplog TUI - terminal client for logging HCP interactions
//!
//! Provides two input modes against the interaction-logging backend:
//! a structured form and a conversational chat that surfaces the
//! fields the backend's AI extracts as the conversation progresses.

pub mod api;
pub mod app;
pub mod chat;
pub mod events;
pub mod input;
pub mod state;
pub mod store;
pub mod ui;

pub use app::{App, AppOptions};
pub use state::AppState;
pub use store::InteractionStore;
