use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_kind")]
    pub kind: StoreKind,

    #[serde(default = "StoreConfig::default_token_path")]
    pub token_path: String,

    #[serde(default = "StoreConfig::default_user_info_path")]
    pub user_info_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "memory")]
    Memory,
}

impl CommonConfig for StoreConfig {
    fn default() -> Self {
        Self {
            kind: Self::default_kind(),
            token_path: Self::default_token_path(),
            user_info_path: Self::default_user_info_path(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if matches!(self.kind, StoreKind::Memory) {
            return Ok(());
        }

        self.token_path = expandenv("token_path", &self.token_path)?;
        if self.token_path.is_empty() {
            let path = ps.data_path.join(Self::TOKEN_SLOT);
            self.token_path = format!("{}", path.display());
        }

        self.user_info_path = expandenv("user_info_path", &self.user_info_path)?;
        if self.user_info_path.is_empty() {
            let path = ps.data_path.join(Self::USER_INFO_SLOT);
            self.user_info_path = format!("{}", path.display());
        }

        Ok(())
    }
}

impl StoreConfig {
    pub const TOKEN_SLOT: &'static str = "token";
    pub const USER_INFO_SLOT: &'static str = "user_info";

    pub fn default_kind() -> StoreKind {
        StoreKind::File
    }

    pub fn default_token_path() -> String {
        String::new()
    }

    pub fn default_user_info_path() -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::tests::test_path_set;

    use super::*;

    #[test]
    fn test_default_paths() {
        let ps = test_path_set("store_config");
        let mut cfg = StoreConfig::default();
        cfg.complete(&ps).unwrap();

        assert_eq!(cfg.kind, StoreKind::File);
        assert_eq!(
            cfg.token_path,
            format!("{}", ps.data_path.join("token").display())
        );
        assert_eq!(
            cfg.user_info_path,
            format!("{}", ps.data_path.join("user_info").display())
        );
    }

    #[test]
    fn test_parse() {
        let cfg: StoreConfig = toml::from_str(
            r#"
            kind = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.kind, StoreKind::Memory);

        let result = toml::from_str::<StoreConfig>(r#"kind = "redis""#);
        assert!(result.is_err());
    }
}
