mod conversation;
mod delete;
mod events;
mod messaging;
mod presence;
mod store;
mod ws;

use axum::{Router, routing::{get, post}};

use crate::AppState;

pub use events::{ClientEvent, PrivateMessageRequest, ServerEvent};
pub use messaging::{DeleteOutcome, Delivery, delete_message, send_private_message};
pub use presence::{Connection, ConnectionId, Presence};
pub use store::{Message, MessageStore, StoreError, StoreResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::chat_ws))
        .route("/chat/{driver_name}/{rider_name}", get(conversation::conversation))
        .route("/delete_message/{id}", post(delete::delete_message))
}
