use axum::{debug_handler, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use super::local_redirect;
use crate::{include_res, res, session::{self, Level, Notice, USER_NAME}, AppResult, Identity};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    name: String,
    return_url: Option<String>,
}

#[debug_handler]
pub(crate) async fn login_page(session: Session) -> AppResult<Html<String>> {
    let notices = session::take_notices(&session).await?;

    Ok(Html(
        include_res!(str, "/pages/login.html")
            .replace("{notices}", &res::notices_html(&notices))
    ))
}

/// Trusts the submitted display name; passwords live outside this service.
#[debug_handler]
pub(crate) async fn login(
    session: Session,
    Form(LoginForm { name, return_url }): Form<LoginForm>,
) -> AppResult<Response> {
    let Some(identity) = Identity::parse(&name) else {
        session::flash(&session, Notice::new(Level::Danger, "Enter a name to log in.")).await?;
        return Ok(Redirect::to("/login").into_response());
    };

    session.cycle_id().await?;
    session.insert(USER_NAME, identity.as_str()).await?;
    session::flash(&session, Notice::new(Level::Success, format!("Welcome, {identity}!"))).await?;
    info!(user = %identity, "logged in");

    Ok(Redirect::to(&local_redirect(return_url.as_deref(), "/")).into_response())
}
