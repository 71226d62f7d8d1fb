use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, warn};

use crate::api::auth::UserSummary;
use crate::config::ensure_dir_exists;
use crate::filelock::{read_file_lock, remove_file_lock, write_file_lock};

use super::{CredentialStore, StoredIdentity};

/// Stores the token and the cached identity in two files. Every access
/// takes a file lock, so several processes can share the same slots.
pub struct FileStore {
    token_path: PathBuf,
    user_info_path: PathBuf,
}

impl FileStore {
    pub fn new(token_path: PathBuf, user_info_path: PathBuf) -> Result<Self> {
        for path in [&token_path, &user_info_path] {
            if let Some(dir) = path.parent() {
                ensure_dir_exists(dir)
                    .with_context(|| format!("ensure store directory: {}", dir.display()))?;
            }
        }
        Ok(Self {
            token_path,
            user_info_path,
        })
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    fn read_token(&self) -> Result<Option<String>> {
        let data = match read_file_lock(&self.token_path)? {
            Some(data) => data,
            None => return Ok(None),
        };
        if data.is_empty() {
            return Ok(None);
        }
        let token = String::from_utf8(data).context("token file is not utf-8")?;
        Ok(Some(token))
    }

    fn read_identity(&self) -> Result<Option<StoredIdentity>> {
        let data = match read_file_lock(&self.user_info_path)? {
            Some(data) => data,
            None => return Ok(None),
        };
        if data.is_empty() {
            return Ok(None);
        }
        let identity = serde_json::from_slice(&data).context("parse user info file")?;
        Ok(Some(identity))
    }
}

impl CredentialStore for FileStore {
    fn save(&self, token: &str) -> Result<()> {
        debug!("Save token to '{}'", self.token_path.display());
        write_file_lock(&self.token_path, token.as_bytes())
            .with_context(|| format!("write token file '{}'", self.token_path.display()))
    }

    fn load(&self) -> Option<String> {
        match self.read_token() {
            Ok(token) => token,
            Err(e) => {
                warn!("Token file cannot be read, treat it as absent: {e:#}");
                None
            }
        }
    }

    fn clear(&self) -> Result<()> {
        debug!("Remove token and user info files");
        let token = remove_file_lock(&self.token_path)
            .with_context(|| format!("remove token file '{}'", self.token_path.display()));
        let user_info = remove_file_lock(&self.user_info_path).with_context(|| {
            format!("remove user info file '{}'", self.user_info_path.display())
        });
        token.and(user_info)
    }

    fn save_identity(&self, user: &UserSummary) -> Result<()> {
        let identity = StoredIdentity {
            user: user.clone(),
            saved_at: Utc::now().timestamp() as u64,
        };
        let data = serde_json::to_vec(&identity).context("encode user info")?;
        write_file_lock(&self.user_info_path, &data)
            .with_context(|| format!("write user info file '{}'", self.user_info_path.display()))
    }

    fn load_identity(&self) -> Option<StoredIdentity> {
        match self.read_identity() {
            Ok(identity) => identity,
            Err(e) => {
                warn!("User info file has invalid data, we will ignore it: {e:#}");
                None
            }
        }
    }
}
