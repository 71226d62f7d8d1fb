use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::logs;
use crate::store::config::StoreConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    /// Transport timeout of a single request, 0 means no timeout.
    #[serde(default = "ClientConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "ClientConfig::default_log_level")]
    pub log_level: String,

    #[serde(default = "StoreConfig::default")]
    pub store: StoreConfig,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            timeout_secs: Self::default_timeout_secs(),
            log_level: Self::default_log_level(),
            store: StoreConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        // The url itself is validated by Client::new.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        if self.timeout_secs > Self::MAX_TIMEOUT_SECS {
            bail!(
                "timeout_secs must be less than or equal to {}",
                Self::MAX_TIMEOUT_SECS
            );
        }

        logs::parse_level(&self.log_level).context("log_level")?;

        self.store.complete(ps).context("store")?;
        Ok(())
    }
}

impl ClientConfig {
    const MAX_TIMEOUT_SECS: u64 = 600;

    pub fn default_server() -> String {
        String::from("http://localhost:8080/api")
    }

    pub fn default_timeout_secs() -> u64 {
        0
    }

    pub fn default_log_level() -> String {
        String::from("info")
    }

    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            return None;
        }
        Some(Duration::from_secs(self.timeout_secs))
    }
}
