use axum::{
    debug_handler,
    extract::{Path, State},
    http::{HeaderMap, header::REFERER},
    response::Redirect,
};
use tower_sessions::Session;

use crate::{AppResult, session::{self, Level, Notice}};

use super::{DeleteOutcome, MessageStore, messaging};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn delete_message(
    Path(id): Path<i64>,
    State(store): State<MessageStore>,
    session: Session,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    let requester = session::identity(&session).await?;

    let notice = match messaging::delete_message(&store, id, requester.as_ref()).await? {
        DeleteOutcome::Deleted => Notice::new(Level::Success, "Message deleted!"),
        DeleteOutcome::Refused => Notice::new(Level::Danger, "You can only delete your own messages."),
    };
    session::flash(&session, notice).await?;

    let back = headers
        .get(REFERER)
        .and_then(|referer| referer.to_str().ok())
        .unwrap_or("/");
    Ok(Redirect::to(back))
}
