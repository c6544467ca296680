use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub itinerary_id: ObjectId,
    pub role: ChatRole,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn new(itinerary_id: ObjectId, role: ChatRole, content: &str) -> Self {
        Self {
            id: None,
            itinerary_id,
            role,
            content: content.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessageView {
    pub role: ChatRole,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&ChatMessage> for ChatMessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatExchange {
    pub question: ChatMessageView,
    pub answer: ChatMessageView,
}
