use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;

use super::{display_json, ConfigArgs, RunCommand};

/// Log in with email and password. A session already held is replaced.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(short, long)]
    pub email: String,

    /// Account password.
    #[arg(short, long)]
    pub password: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        let session = self.config.build_factory()?.build_session()?;
        let user = session
            .login(&self.email, &self.password)
            .await
            .context("login")?;
        display_json(user)
    }
}
