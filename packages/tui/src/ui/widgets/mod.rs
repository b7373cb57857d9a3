pub mod chat;
pub mod form;
pub mod notification;
pub mod status_bar;

pub use chat::{ChatWidget, ExtractedPanel, InputWidget};
pub use form::InteractionForm;
pub use notification::NotificationWidget;
pub use status_bar::StatusBar;
