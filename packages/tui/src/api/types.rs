use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::chat::ChatTurn;

/// Fields the AI has pulled out of the conversation so far, keyed by
/// interaction field name. Replaced wholesale by each server response.
pub type ExtractedData = BTreeMap<String, serde_json::Value>;

/// Overall tone of the interaction as reported by the rep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sentiment {
    /// Not selected; serialized as an empty string on the wire.
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Unspecified,
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Unspecified => "Not specified",
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

/// The six structured-form fields, as entered by the user.
///
/// `interaction_date` stays an ISO `YYYY-MM-DD` string end to end; the
/// backend owns canonical date handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionDraft {
    pub hcp_name: String,
    pub interaction_date: String,
    pub products_discussed: String,
    pub key_discussion_points: String,
    pub sentiment: Sentiment,
    pub follow_up_actions: String,
}

impl InteractionDraft {
    /// An empty draft with the interaction date defaulting to today.
    pub fn with_today() -> Self {
        Self {
            hcp_name: String::new(),
            interaction_date: Local::now().format("%Y-%m-%d").to_string(),
            products_discussed: String::new(),
            key_discussion_points: String::new(),
            sentiment: Sentiment::Unspecified,
            follow_up_actions: String::new(),
        }
    }
}

/// A server-echoed interaction record. The server assigns identity;
/// optional fields are tolerated as absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub hcp_name: String,
    pub interaction_date: String,
    #[serde(default)]
    pub products_discussed: Option<String>,
    #[serde(default)]
    pub key_discussion_points: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub follow_up_actions: Option<String>,
    #[serde(default)]
    pub interaction_method: Option<String>,
    #[serde(default)]
    pub raw_chat_log: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Request body for the conversational endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub current_extraction_data: ExtractedData,
}

/// Response from the conversational endpoint: the assistant's reply,
/// whether the interaction is fully captured, and the running
/// extracted-field mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub ai_message: String,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub extracted_data: Option<ExtractedData>,
    #[serde(default)]
    pub interaction_id: Option<i64>,
}

/// Turn a wire field name into a display label: underscores become
/// spaces and each word is capitalized (`hcp_name` -> `Hcp Name`).
pub fn humanize_field_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a value earns a row in the extracted-data panel: null,
/// empty strings, `false` and zero are skipped.
pub fn is_displayable(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        _ => true,
    }
}
