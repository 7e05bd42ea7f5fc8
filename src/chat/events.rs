use serde::{Deserialize, Serialize};

use crate::Identity;

/// Frames a client may send over the chat socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    PrivateMessage(PrivateMessageRequest),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrivateMessageRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PrivateMessageRequest {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: Some(to.into()),
            message: Some(message.into()),
        }
    }
}

/// Frames the server pushes to connected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    UpdateUsers {
        count: usize,
    },
    PrivateMessage {
        from: Identity,
        message: String,
        id: i64,
    },
}
