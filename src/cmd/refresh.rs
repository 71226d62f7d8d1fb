use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;

use super::{display_json, ConfigArgs, RunCommand};

/// Exchange the stored token for a new one.
#[derive(Args)]
pub struct RefreshArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for RefreshArgs {
    async fn run(&self) -> Result<()> {
        let session = self.config.build_factory()?.build_session()?;
        let user = session.refresh().await.context("refresh token")?;
        display_json(user)
    }
}
