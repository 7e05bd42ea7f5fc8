use axum::{debug_handler, extract::Query, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use super::local_redirect;
use crate::{AppResult, session};

#[derive(Deserialize)]
pub(crate) struct LogoutQuery {
    pub(crate) return_url: Option<String>,
}

#[debug_handler]
pub(crate) async fn logout(
    Query(LogoutQuery { return_url }): Query<LogoutQuery>,
    session: Session
) -> AppResult<Redirect> {
    if let Some(user) = session::identity(&session).await? {
        info!(%user, "logged out");
    }
    session.clear().await;
    Ok(Redirect::to(&local_redirect(return_url.as_deref(), "/login")))
}
