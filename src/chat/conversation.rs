use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::{AppResult, Identity, session::{self, Level, Notice}};

use super::{Message, MessageStore};

#[derive(Debug, Serialize)]
pub(crate) struct ConversationView {
    user_name: Identity,
    chatting_with: Identity,
    messages: Vec<Message>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn conversation(
    Path((driver_name, rider_name)): Path<(String, String)>,
    State(store): State<MessageStore>,
    session: Session,
) -> AppResult<Response> {
    let Some(user_name) = session::identity(&session).await? else {
        session::flash(&session, Notice::new(Level::Danger, "Log in first to chat.")).await?;
        return Ok(Redirect::to("/login").into_response());
    };

    let (Some(driver), Some(rider)) = (Identity::parse(&driver_name), Identity::parse(&rider_name)) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let messages = store.conversation(&driver, &rider).await?;
    let chatting_with = if user_name == rider { driver } else { rider };

    Ok(Json(ConversationView {
        user_name,
        chatting_with,
        messages,
    })
    .into_response())
}
