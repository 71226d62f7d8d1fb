use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::Utc;

use crate::api::auth::UserSummary;

use super::{CredentialStore, StoredIdentity};

#[derive(Default)]
struct Slots {
    token: Option<String>,
    identity: Option<StoredIdentity>,
}

/// Keeps the credential in process memory only, nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<Slots>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`, as if a previous run had
    /// logged in.
    pub fn with_token(token: impl ToString) -> Self {
        Self {
            slots: Mutex::new(Slots {
                token: Some(token.to_string()),
                identity: None,
            }),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        // Every write replaces a whole slot, so a poisoned lock still holds
        // consistent data.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, token: &str) -> Result<()> {
        self.slots().token = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Option<String> {
        self.slots().token.clone()
    }

    fn clear(&self) -> Result<()> {
        let mut slots = self.slots();
        slots.token = None;
        slots.identity = None;
        Ok(())
    }

    fn save_identity(&self, user: &UserSummary) -> Result<()> {
        self.slots().identity = Some(StoredIdentity {
            user: user.clone(),
            saved_at: Utc::now().timestamp() as u64,
        });
        Ok(())
    }

    fn load_identity(&self) -> Option<StoredIdentity> {
        self.slots().identity.clone()
    }
}
