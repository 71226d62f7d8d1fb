use log::{debug, warn};
use reqwest::Method;

use crate::api::user::{ProfilePatch, User, PROFILE_PATH};
use crate::client::{Client, Payload, RequestError};

/// Reads and writes the profile of the logged in user.
///
/// Calls are forwarded even without a credential; the server's answer
/// decides the outcome.
pub struct ProfileAccessor {
    client: Client,
}

impl ProfileAccessor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn get_profile(&self) -> Result<User, RequestError> {
        let user: User = self
            .client
            .send_data(
                Method::GET,
                PROFILE_PATH,
                Payload::None,
                "failed to get user profile",
            )
            .await?;
        self.refresh_identity(&user);
        Ok(user)
    }

    /// Sends only the fields set in `patch` and returns the server's record,
    /// which replaces whatever the caller held before.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<User, RequestError> {
        let user: User = self
            .client
            .send_data(
                Method::PUT,
                PROFILE_PATH,
                Payload::json(patch)?,
                "failed to update user profile",
            )
            .await?;
        self.refresh_identity(&user);
        Ok(user)
    }

    fn refresh_identity(&self, user: &User) {
        let store = self.client.store();
        if !store.has_token() {
            return;
        }
        debug!("Refresh cached identity of user '{}'", user.username);
        if let Err(e) = store.save_identity(&user.summary()) {
            warn!("Cache user identity failed: {e:#}");
        }
    }
}
