pub mod auth;
pub mod user;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ACCEPT: &str = "Accept";
pub const MIME_JSON: &str = "application/json";

/// The wrapper every API result is delivered in.
///
/// `success` is the only field the server always sends. When it is true,
/// endpoints that declare a payload put it in `data`; when it is false,
/// `message` or `error` usually explain why, but both may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct Envelope<T: Serialize + DeserializeOwned> {
    pub success: bool,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize + DeserializeOwned> Envelope<T> {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            error: None,
        }
    }

    pub fn with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn failed(message: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
            error: None,
        }
    }

    /// The human readable reason of a failed envelope, `message` first.
    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.error.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

/// Servers are not consistent about ids: some send `"1"`, some send `1`.
/// Both are kept as strings on our side.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
