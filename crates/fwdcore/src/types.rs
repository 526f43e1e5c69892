//! Actor identifiers and member profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable numeric id of a requester or the owner.
///
/// In the store document ids are the decimal string keys of the
/// `users` / `pending_users` maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl ActorId {
    /// String form used as a key in the store document.
    pub fn key(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(ActorId)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        ActorId(id)
    }
}

/// Record stored for members and pending requesters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Full display name as reported by the platform
    #[serde(alias = "display_name")]
    pub name: String,
    /// Username without the leading `@`, if the actor has one
    #[serde(default)]
    pub username: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, username: Option<String>) -> Self {
        Self {
            name: name.into(),
            username,
        }
    }

    /// `@username` when available, otherwise the display name.
    pub fn handle(&self) -> String {
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => self.name.clone(),
        }
    }
}
