// Re-export all models from their respective modules
pub mod archive;
pub mod auth;
pub mod knowledge;
pub mod user;

use serde::{Deserialize, Deserializer};

// Re-export commonly used models
pub use archive::*;
pub use auth::*;
pub use knowledge::*;
pub use user::*;

/// Lets partial-update payloads tell an absent key (`None`) apart from an
/// explicit `null` (`Some(None)`). Pair with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(serde::Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
