use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use authsync::api::user::ProfilePatch;
use clap::{Args, Subcommand};

use super::{display_json, ConfigArgs, RunCommand};

/// Read or update the profile of the logged in user.
#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    Get(GetProfileArgs),
    Update(UpdateProfileArgs),
}

#[async_trait]
impl RunCommand for ProfileCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            ProfileCommands::Get(args) => args.run().await,
            ProfileCommands::Update(args) => args.run().await,
        }
    }
}

/// Fetch the profile from the server.
#[derive(Args)]
pub struct GetProfileArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for GetProfileArgs {
    async fn run(&self) -> Result<()> {
        let profile = self.config.build_factory()?.build_profile()?;
        let user = profile.get_profile().await.context("get profile")?;
        display_json(user)
    }
}

/// Update some profile fields; fields not given are left unchanged.
#[derive(Args)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub avatar: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for UpdateProfileArgs {
    async fn run(&self) -> Result<()> {
        let patch = ProfilePatch {
            username: self.username.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        };
        if patch.is_empty() {
            bail!("nothing to update, please provide at least one field");
        }

        let profile = self.config.build_factory()?.build_profile()?;
        let user = profile
            .update_profile(&patch)
            .await
            .context("update profile")?;
        display_json(user)
    }
}
