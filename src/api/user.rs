use serde::{Deserialize, Serialize};

use super::auth::UserSummary;
use super::deserialize_id;

pub const PROFILE_PATH: &str = "/user/profile";

/// The server's user record. The client never edits it in place, it only
/// keeps whatever the server returned last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    pub username: String,

    pub email: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Partial user sent to `PUT /user/profile`. Only the fields that are set
/// go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}
