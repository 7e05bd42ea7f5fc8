pub mod appresult;
pub mod auth;
pub mod chat;
pub mod config;
pub mod identity;
pub mod index;
pub mod res;
pub mod session;

use axum::{extract::FromRef, routing::get, Router};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};
pub use chat::{MessageStore, Presence};
pub use config::Config;
pub use identity::Identity;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: MessageStore,
    pub presence: Presence,
}

impl AppState {
    pub fn new(store: MessageStore) -> Self {
        Self {
            store,
            presence: Presence::new(),
        }
    }
}

pub fn app(app_state: AppState, config: &Config) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(config.session_inactivity_minutes)));

    Router::new()
        .route("/", get(index::index))

        .merge(auth::router())
        .merge(chat::router())

        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
