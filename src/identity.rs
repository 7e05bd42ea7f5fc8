use std::fmt;

use serde::{Deserialize, Serialize};

/// Display name a user logged in with. Addresses them for presence and
/// messaging; always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Option<Identity> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Identity(trimmed.to_owned()))
    }

    /// Rebuilds an identity read back from the database.
    pub(crate) fn from_stored(name: String) -> Identity {
        Identity(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
