//! Store-driving actions around the two backend calls.
//!
//! Each operation is split into a synchronous `begin_*` phase (store
//! transitions before the request leaves) and a `finish_*` phase that
//! applies the outcome. The event loop uses the phases around a
//! spawned request so the UI keeps rendering the in-flight state; the
//! combined async functions compose both for sequential callers.

use tracing::{info, warn};

use crate::api::client::{ApiClient, ApiError, CHAT_SEND_FAILURE};
use crate::api::types::{ChatRequest, ChatResponse, InteractionDraft, InteractionRecord};
use crate::store::InteractionStore;

/// Mark the form submission as in flight.
pub fn begin_form_submit(store: &mut InteractionStore) {
    store.begin_form_request();
}

/// Apply a form submission outcome to the store and hand it back.
pub fn finish_form_submit(
    store: &mut InteractionStore,
    outcome: Result<InteractionRecord, ApiError>,
) -> Result<InteractionRecord, ApiError> {
    match outcome {
        Ok(record) => {
            info!(id = record.id, "interaction logged via form");
            store.form_succeeded(record.clone());
            Ok(record)
        }
        Err(err) => {
            warn!(error = %err, "form submission failed");
            store.form_failed(err.message());
            Err(err)
        }
    }
}

/// Submit the structured form and record the echoed interaction.
pub async fn submit_interaction_form(
    client: &ApiClient,
    store: &mut InteractionStore,
    draft: &InteractionDraft,
) -> Result<InteractionRecord, ApiError> {
    begin_form_submit(store);
    finish_form_submit(store, client.log_interaction_form(draft).await)
}

/// Snapshot the conversational context, mark the chat request as in
/// flight and echo the user's turn locally. The snapshot is taken
/// before the echo so the request body matches the pre-send transcript.
pub fn begin_chat_send(store: &mut InteractionStore, message: impl Into<String>) -> ChatRequest {
    let message = message.into();
    let request = ChatRequest {
        message: message.clone(),
        history: store.chat_history().to_vec(),
        current_extraction_data: store.extracted().clone(),
    };
    store.begin_chat_request();
    store.push_user_turn(message);
    request
}

/// Apply a chat outcome. On failure the store receives both the error
/// (for the banner) and a synthetic assistant turn prefixed `Error:`
/// carrying the unchanged extracted mapping, so the transcript records
/// the failure in place.
pub fn finish_chat_send(
    store: &mut InteractionStore,
    outcome: Result<ChatResponse, ApiError>,
) -> Result<ChatResponse, ApiError> {
    match outcome {
        Ok(response) => {
            store.chat_chunk(response.clone());
            Ok(response)
        }
        Err(err) => {
            warn!(error = %err, "chat message failed");
            let message = err.message_or(CHAT_SEND_FAILURE);
            store.chat_failed(message.clone());
            store.chat_chunk(ChatResponse {
                ai_message: format!("Error: {message}"),
                is_complete: false,
                extracted_data: Some(store.extracted().clone()),
                interaction_id: None,
            });
            Err(err)
        }
    }
}

/// Send one chat message with the current context and apply the reply.
pub async fn send_chat_message(
    client: &ApiClient,
    store: &mut InteractionStore,
    message: impl Into<String>,
) -> Result<ChatResponse, ApiError> {
    let request = begin_chat_send(store, message);
    finish_chat_send(store, client.log_interaction_chat(&request).await)
}
