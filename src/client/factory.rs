use anyhow::Result;

use crate::config::{CommonConfig, PathSet};
use crate::profile::ProfileAccessor;
use crate::session::SessionManager;
use crate::store::factory::StoreFactory;

use super::config::ClientConfig;
use super::Client;

pub struct ClientFactory {
    cfg: ClientConfig,
}

impl ClientFactory {
    pub fn new(cfg: ClientConfig) -> Self {
        Self { cfg }
    }

    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("client", ClientConfig::default)?;
        Ok(Self { cfg })
    }

    /// Builds a client over the configured credential store.
    pub fn build_client(&self) -> Result<Client> {
        let store = StoreFactory::new(self.cfg.store.clone()).build_store()?;
        Client::new(&self.cfg.server, self.cfg.timeout(), store)
    }

    pub fn build_session(&self) -> Result<SessionManager> {
        let client = self.build_client()?;
        Ok(SessionManager::new(client))
    }

    pub fn build_profile(&self) -> Result<ProfileAccessor> {
        let client = self.build_client()?;
        Ok(ProfileAccessor::new(client))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }
}
