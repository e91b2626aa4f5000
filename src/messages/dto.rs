use serde::{Deserialize, Serialize};

use crate::messages::repo::Message;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_name: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub success: bool,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct SentResponse {
    pub success: bool,
    pub message: String,
    pub data: Message,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}
