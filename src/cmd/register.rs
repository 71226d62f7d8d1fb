use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;

use super::{display_json, ConfigArgs, RunCommand};

/// Create a new account and log in with it.
#[derive(Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for RegisterArgs {
    async fn run(&self) -> Result<()> {
        let session = self.config.build_factory()?.build_session()?;
        let user = session
            .register(&self.username, &self.email, &self.password)
            .await
            .context("register")?;
        display_json(user)
    }
}
