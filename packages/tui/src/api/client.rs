use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::api::types::{ChatRequest, ChatResponse, InteractionDraft, InteractionRecord};

/// Fallback when neither the server nor the transport gave us anything
/// readable to show.
pub const GENERIC_FAILURE: &str = "An unknown error occurred";
/// Chat sends carry their own fallback so the transcript annotation
/// names the operation that failed.
pub const CHAT_SEND_FAILURE: &str = "Failed to send chat message";

/// Failure talking to the interaction-logging backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; `detail` is the server's structured message if
    /// the body carried one.
    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Derive the human-readable message shown in banners and the
    /// transcript: server detail, then transport error text, then a
    /// fixed fallback.
    pub fn message(&self) -> String {
        self.message_or(GENERIC_FAILURE)
    }

    /// Like [`message`](Self::message) with an operation-specific
    /// fallback. A non-2xx response without a structured detail still
    /// names its status rather than collapsing to the fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { detail, .. } if !detail.is_empty() => detail.clone(),
            ApiError::Server { status, .. } => {
                format!("Request failed with status code {status}")
            }
            ApiError::Transport(err) => {
                let text = err.to_string();
                if text.is_empty() {
                    fallback.to_string()
                } else {
                    text
                }
            }
        }
    }
}

/// Shape of the backend's structured error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client for the interaction-logging backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the server root for reachability.
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let root = self.base_url.trim_end_matches("/api");
        let response = self.client.get(format!("{}/", root)).send().await?;
        Ok(response.status().is_success())
    }

    /// Log an interaction captured through the structured form. Returns
    /// the server-echoed record with its assigned identity.
    pub async fn log_interaction_form(
        &self,
        draft: &InteractionDraft,
    ) -> Result<InteractionRecord, ApiError> {
        self.post_json("log_interaction_form", draft).await
    }

    /// Send one conversational turn with its context.
    pub async fn log_interaction_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ApiError> {
        self.post_json("log_interaction_chat", request).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.detail)
                .unwrap_or_default();
            Err(ApiError::Server {
                status: status.as_u16(),
                detail,
            })
        }
    }
}
