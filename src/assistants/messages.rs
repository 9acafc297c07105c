use crate::{client::OpenAiClient, ApiResponseOrError};
use derive_builder::Builder;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{null_as_empty, Metadata};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Message {
    pub id: String,
    /// Always `thread.message`.
    pub object: String,
    pub created_at: i64,
    /// The thread ID that this message belongs to.
    pub thread_id: String,
    /// The entity that produced the message.
    pub role: Role,
    /// Text and image parts of the message, exactly as the API returned them.
    pub content: Vec<Value>,
    /// The assistant that authored this message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    /// The run that authored this message. Null for messages created manually.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Files the assistant may use for this message. At most 10.
    pub file_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Assistant,
}

/// The payload of a message posted to a thread.
#[derive(Serialize, Deserialize, Builder, Debug, Clone, PartialEq)]
#[builder(pattern = "owned")]
#[builder(name = "ThreadMessageBuilder")]
#[builder(setter(strip_option, into))]
pub struct ThreadMessage {
    #[builder(default)]
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub metadata: Option<Metadata>,
}

impl ThreadMessage {
    pub fn builder(content: impl Into<String>) -> ThreadMessageBuilder {
        ThreadMessageBuilder::create_empty().content(content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            file_ids: None,
            metadata: None,
        }
    }
}

/// Body of [`OpenAiClient::create_message`]. On the wire it is the message
/// payload itself.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MessageRequest {
    #[serde(flatten)]
    pub message: ThreadMessage,
}

impl From<ThreadMessage> for MessageRequest {
    fn from(message: ThreadMessage) -> Self {
        Self { message }
    }
}

impl OpenAiClient {
    /// Posts a new message to an existing thread.
    pub async fn create_message(
        &self,
        thread_id: &str,
        request: MessageRequest,
    ) -> ApiResponseOrError<Message> {
        self.post(
            format!("threads/{thread_id}/messages"),
            request,
            HeaderMap::new(),
        )
        .await
    }
}
