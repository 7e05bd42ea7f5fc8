use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{AppResult, Identity};

pub const USER_NAME: &str = "user_name";
pub const FLASH: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Danger,
    Warning,
    Info,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Danger => "danger",
            Level::Warning => "warning",
            Level::Info => "info",
        }
    }
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn new(level: Level, text: impl Into<String>) -> Notice {
        Notice { level, text: text.into() }
    }
}

pub async fn identity(session: &Session) -> AppResult<Option<Identity>> {
    Ok(session
        .get::<String>(USER_NAME)
        .await?
        .and_then(|name| Identity::parse(&name)))
}

pub async fn flash(session: &Session, notice: Notice) -> AppResult<()> {
    let mut notices: Vec<Notice> = session.get(FLASH).await?.unwrap_or_default();
    notices.push(notice);
    session.insert(FLASH, notices).await?;
    Ok(())
}

pub async fn take_notices(session: &Session) -> AppResult<Vec<Notice>> {
    Ok(session.remove(FLASH).await?.unwrap_or_default())
}
