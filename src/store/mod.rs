pub mod config;
pub mod factory;
pub mod file;
pub mod memory;


use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::auth::UserSummary;

/// The cached session identity, with the time (unix seconds) it was cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIdentity {
    #[serde(flatten)]
    pub user: UserSummary,

    pub saved_at: u64,
}

/// Holds at most one session credential and the identity that came with
/// it. Saving a new token replaces the old one.
///
/// `load` and `load_identity` never fail: a slot that cannot be read is
/// reported as absent. `clear` on an empty store succeeds.
pub trait CredentialStore: Send + Sync {
    fn save(&self, token: &str) -> Result<()>;

    fn load(&self) -> Option<String>;

    /// Removes the token and the cached identity.
    fn clear(&self) -> Result<()>;

    fn save_identity(&self, user: &UserSummary) -> Result<()>;

    fn load_identity(&self) -> Option<StoredIdentity>;

    fn has_token(&self) -> bool {
        self.load().is_some()
    }
}
