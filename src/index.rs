use axum::{debug_handler, response::{Html, IntoResponse, Redirect, Response}};
use tower_sessions::Session;

use crate::{include_res, res, session, AppResult};

#[debug_handler]
pub async fn index(session: Session) -> AppResult<Response> {
    let Some(user_name) = session::identity(&session).await? else {
        return Ok(
            Redirect::to("/login")
                .into_response()
        );
    };
    let notices = session::take_notices(&session).await?;

    Ok(
        Html(
            include_res!(str, "/pages/index.html")
                .replace("{notices}", &res::notices_html(&notices))
                .replace("{user_name}", &res::escape(user_name.as_str()))
        ).into_response()
    )
}
