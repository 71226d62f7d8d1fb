use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{ConfigArgs, RunCommand};

/// Log out. The local session is dropped even if the server cannot be
/// reached.
#[derive(Args)]
pub struct LogoutArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self) -> Result<()> {
        let session = self.config.build_factory()?.build_session()?;
        session.logout().await;
        Ok(())
    }
}
