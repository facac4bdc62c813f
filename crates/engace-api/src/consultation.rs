use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::client::{encode_component, ApiClient};
use crate::envelope::Acknowledgement;
use crate::{require, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub is_user: bool,
    /// Display time such as `10:08 PM`.
    pub timestamp: String,
}

impl Message {
    /// The local echo of what the user typed, shown before the reply arrives.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self::from_user_at(content, Local::now())
    }

    pub fn from_user_at<Tz: TimeZone>(content: impl Into<String>, at: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id: u64::try_from(at.timestamp_millis()).unwrap_or_default(),
            content: content.into(),
            is_user: true,
            timestamp: at.format("%I:%M %p").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationHistory {
    pub id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ConsultationService<'a> {
    api: &'a ApiClient,
}

impl<'a> ConsultationService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Sends a message and returns the assistant's reply.
    pub async fn send_message(&self, content: &str) -> Result<Message, ApiError> {
        let content = require("message", content)?;
        self.api
            .post_data(
                "/consultation/message",
                &serde_json::json!({ "content": content }),
            )
            .await
    }

    pub async fn conversation_history(&self) -> Result<Vec<ConversationHistory>, ApiError> {
        self.api.get_data("/consultation/history").await
    }

    pub async fn conversation(&self, id: &str) -> Result<ConversationHistory, ApiError> {
        let id = require("conversation id", id)?;
        let endpoint = format!("/consultation/history/{}", encode_component(id));
        self.api.get_data(&endpoint).await
    }

    pub async fn clear_conversation(&self) -> Result<Acknowledgement, ApiError> {
        self.api.delete_data("/consultation/clear").await
    }
}
