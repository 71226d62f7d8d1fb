use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};

use super::config::{StoreConfig, StoreKind};
use super::file::FileStore;
use super::memory::MemoryStore;
use super::CredentialStore;

pub struct StoreFactory {
    cfg: StoreConfig,
}

impl StoreFactory {
    pub fn new(cfg: StoreConfig) -> Self {
        Self { cfg }
    }

    pub fn build_store(&self) -> Result<Arc<dyn CredentialStore>> {
        match self.cfg.kind {
            StoreKind::File => {
                info!("Using file credential store '{}'", self.cfg.token_path);
                let store = FileStore::new(
                    PathBuf::from(&self.cfg.token_path),
                    PathBuf::from(&self.cfg.user_info_path),
                )?;
                Ok(Arc::new(store))
            }
            StoreKind::Memory => {
                warn!("Using memory credential store, the session will not outlive this process");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::tests::test_path_set;
    use crate::config::CommonConfig;

    use super::*;

    #[test]
    fn test_build_file_store() {
        let ps = test_path_set("store_factory");
        let mut cfg = StoreConfig::default();
        cfg.complete(&ps).unwrap();

        let store = StoreFactory::new(cfg).build_store().unwrap();
        store.save("from-factory").unwrap();
        assert!(ps.data_path.join("token").exists());
        store.clear().unwrap();
        assert!(!ps.data_path.join("token").exists());
    }

    #[test]
    fn test_build_memory_store() {
        let cfg = StoreConfig {
            kind: StoreKind::Memory,
            ..StoreConfig::default()
        };
        let store = StoreFactory::new(cfg).build_store().unwrap();
        assert!(store.load().is_none());
        store.save("x").unwrap();
        assert_eq!(store.load().as_deref(), Some("x"));
    }
}
