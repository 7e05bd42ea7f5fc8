mod login;
mod logout;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
}

/// Keeps `return_url` on this site: only absolute paths, never `//host` or `/\host`.
pub(crate) fn local_redirect(return_url: Option<&str>, fallback: &str) -> String {
    match return_url {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\") => url.to_owned(),
        _ => fallback.to_owned(),
    }
}
