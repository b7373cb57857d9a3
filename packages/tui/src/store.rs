use crate::api::types::{ChatResponse, ExtractedData, InteractionRecord};
use crate::chat::ChatTurn;

/// Whether a mode currently has a request on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    InFlight,
}

/// Client-side interaction state: logged records, transcript, the
/// running extracted-field mapping and per-mode request bookkeeping.
///
/// Every mutation goes through one of the transition methods below.
/// Transitions are synchronous and do no I/O; the API actions in
/// [`crate::api::actions`] drive them around the HTTP calls.
///
/// The form and chat tabs each track their own request status, so an
/// in-flight chat message never makes the form look busy (and vice
/// versa).
#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    interactions: Vec<InteractionRecord>,
    form_status: RequestStatus,
    chat_status: RequestStatus,
    error: Option<String>,
    chat_history: Vec<ChatTurn>,
    current_ai_message: String,
    chat_complete: bool,
    extracted: ExtractedData,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- transitions ---

    /// A form submission is going out.
    pub fn begin_form_request(&mut self) {
        self.form_status = RequestStatus::InFlight;
        self.error = None;
    }

    /// A chat message is going out.
    pub fn begin_chat_request(&mut self) {
        self.chat_status = RequestStatus::InFlight;
        self.error = None;
    }

    /// The form submission resolved; the server echoed the record back.
    pub fn form_succeeded(&mut self, record: InteractionRecord) {
        self.form_status = RequestStatus::Idle;
        self.interactions.push(record);
    }

    /// A chat response arrived. Appends the assistant turn (if any),
    /// replaces the extracted mapping wholesale, and resets it once the
    /// server reports the interaction as logged.
    pub fn chat_chunk(&mut self, response: ChatResponse) {
        self.chat_status = RequestStatus::Idle;

        if !response.ai_message.is_empty() {
            self.chat_history
                .push(ChatTurn::assistant(response.ai_message.clone()));
        }
        self.current_ai_message = response.ai_message;
        self.chat_complete = response.is_complete;

        if let Some(extracted) = response.extracted_data {
            self.extracted = extracted;
        }
        if response.is_complete && response.interaction_id.is_some() {
            // Interaction is logged server-side; start collecting fresh.
            self.extracted.clear();
        }
    }

    /// Optimistic local echo of an outgoing user message.
    pub fn push_user_turn(&mut self, content: impl Into<String>) {
        self.chat_history.push(ChatTurn::user(content.into()));
    }

    pub fn form_failed(&mut self, message: impl Into<String>) {
        self.form_status = RequestStatus::Idle;
        self.error = Some(message.into());
    }

    pub fn chat_failed(&mut self, message: impl Into<String>) {
        self.chat_status = RequestStatus::Idle;
        self.error = Some(message.into());
    }

    /// Reset the conversation to its initial state. Idempotent.
    pub fn clear_chat(&mut self) {
        self.chat_history.clear();
        self.current_ai_message.clear();
        self.chat_complete = false;
        self.extracted.clear();
    }

    pub fn reset_error(&mut self) {
        self.error = None;
    }

    // --- accessors ---

    pub fn interactions(&self) -> &[InteractionRecord] {
        &self.interactions
    }

    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chat_history
    }

    pub fn extracted(&self) -> &ExtractedData {
        &self.extracted
    }

    pub fn current_ai_message(&self) -> &str {
        &self.current_ai_message
    }

    pub fn is_chat_complete(&self) -> bool {
        self.chat_complete
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_form_loading(&self) -> bool {
        self.form_status == RequestStatus::InFlight
    }

    pub fn is_chat_loading(&self) -> bool {
        self.chat_status == RequestStatus::InFlight
    }

    /// True exactly when a chat request is in flight and the newest
    /// turn is the user's, i.e. the UI should show a thinking line.
    pub fn awaiting_reply(&self) -> bool {
        self.is_chat_loading()
            && self
                .chat_history
                .last()
                .map(|turn| turn.role == crate::chat::ChatRole::User)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn chunk(ai_message: &str, is_complete: bool) -> ChatResponse {
        serde_json::from_value(json!({
            "ai_message": ai_message,
            "is_complete": is_complete,
        }))
        .unwrap()
    }

    fn record(id: i64, hcp_name: &str) -> InteractionRecord {
        serde_json::from_value(json!({
            "id": id,
            "hcp_name": hcp_name,
            "interaction_date": "2024-01-01",
        }))
        .unwrap()
    }

    #[test]
    fn test_begin_request_sets_status_and_clears_error() {
        let mut store = InteractionStore::new();
        store.form_failed("boom");
        assert_eq!(store.error(), Some("boom"));

        store.begin_form_request();
        assert!(store.is_form_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_statuses_are_independent_per_mode() {
        let mut store = InteractionStore::new();
        store.begin_chat_request();
        assert!(store.is_chat_loading());
        assert!(!store.is_form_loading());

        store.begin_form_request();
        store.chat_chunk(chunk("hello", false));
        assert!(store.is_form_loading());
        assert!(!store.is_chat_loading());
    }

    #[test]
    fn test_form_success_appends_record_and_goes_idle() {
        let mut store = InteractionStore::new();
        store.begin_form_request();
        store.form_succeeded(record(1, "Dr. Smith"));

        assert!(!store.is_form_loading());
        assert_eq!(store.interactions().len(), 1);
        assert_eq!(store.interactions()[0].hcp_name, "Dr. Smith");
    }

    #[test]
    fn test_chat_round_trip_scenario() {
        let mut store = InteractionStore::new();
        store.begin_chat_request();
        store.push_user_turn("Met Dr. Smith today");

        let response: ChatResponse = serde_json::from_value(json!({
            "ai_message": "Got it, what products?",
            "is_complete": false,
            "extracted_data": {"hcp_name": "Dr. Smith"},
        }))
        .unwrap();
        store.chat_chunk(response);

        let history = store.chat_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "Met Dr. Smith today");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "Got it, what products?");
        assert_eq!(store.extracted()["hcp_name"], json!("Dr. Smith"));
        assert!(!store.is_chat_loading());
    }

    #[test]
    fn test_empty_ai_message_is_not_appended() {
        let mut store = InteractionStore::new();
        store.chat_chunk(chunk("", false));
        assert!(store.chat_history().is_empty());
        assert_eq!(store.current_ai_message(), "");
    }

    #[test]
    fn test_completion_with_id_resets_extracted_data() {
        let mut store = InteractionStore::new();
        let response: ChatResponse = serde_json::from_value(json!({
            "ai_message": "Logged it.",
            "is_complete": true,
            "extracted_data": {"hcp_name": "Dr. Smith"},
            "interaction_id": 42,
        }))
        .unwrap();
        store.chat_chunk(response);

        assert!(store.is_chat_complete());
        assert!(store.extracted().is_empty());
    }

    #[test]
    fn test_completion_without_id_keeps_extracted_data() {
        let mut store = InteractionStore::new();
        let response: ChatResponse = serde_json::from_value(json!({
            "ai_message": "Ready to log.",
            "is_complete": true,
            "extracted_data": {"hcp_name": "Dr. Smith"},
        }))
        .unwrap();
        store.chat_chunk(response);

        assert_eq!(store.extracted()["hcp_name"], json!("Dr. Smith"));
    }

    #[test]
    fn test_extracted_data_is_replaced_not_merged() {
        let mut store = InteractionStore::new();
        let first: ChatResponse = serde_json::from_value(json!({
            "ai_message": "a",
            "extracted_data": {"hcp_name": "Dr. Smith", "sentiment": "Positive"},
        }))
        .unwrap();
        store.chat_chunk(first);

        let second: ChatResponse = serde_json::from_value(json!({
            "ai_message": "b",
            "extracted_data": {"hcp_name": "Dr. Jones"},
        }))
        .unwrap();
        store.chat_chunk(second);

        assert_eq!(store.extracted().len(), 1);
        assert_eq!(store.extracted()["hcp_name"], json!("Dr. Jones"));
    }

    #[test]
    fn test_clear_chat_is_idempotent() {
        let mut store = InteractionStore::new();
        store.push_user_turn("hello");
        let first: ChatResponse = serde_json::from_value(json!({
            "ai_message": "hi",
            "extracted_data": {"hcp_name": "Dr. Smith"},
        }))
        .unwrap();
        store.chat_chunk(first);

        store.clear_chat();
        let snapshot = store.clone();
        store.clear_chat();

        assert!(store.chat_history().is_empty());
        assert!(store.extracted().is_empty());
        assert_eq!(store.current_ai_message(), "");
        assert!(!store.is_chat_complete());
        assert_eq!(store.chat_history().len(), snapshot.chat_history().len());
        assert_eq!(store.extracted().len(), snapshot.extracted().len());
    }

    #[test]
    fn test_failure_sets_error_and_goes_idle() {
        let mut store = InteractionStore::new();
        store.begin_chat_request();
        store.chat_failed("connection refused");

        assert!(!store.is_chat_loading());
        assert_eq!(store.error(), Some("connection refused"));

        store.reset_error();
        assert!(store.error().is_none());
    }

    #[test]
    fn test_awaiting_reply_requires_in_flight_and_user_last() {
        let mut store = InteractionStore::new();
        assert!(!store.awaiting_reply());

        store.begin_chat_request();
        store.push_user_turn("hello");
        assert!(store.awaiting_reply());

        store.chat_chunk(chunk("hi there", false));
        assert!(!store.awaiting_reply());
    }
}
