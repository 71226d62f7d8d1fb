mod config;
mod login;
mod logout;
mod profile;
mod refresh;
mod register;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use authsync::client::config::ClientConfig;
use authsync::client::factory::ClientFactory;
use authsync::config::PathSet;
use authsync::logs;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// The config directory, default is `~/.config/authsync`, or env
    /// `AUTHSYNC_CONFIG`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// The data directory holding the session, default is
    /// `~/.local/share/authsync`, or env `AUTHSYNC_DATA`.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Log level, one of "off", "error", "warn", "info", "debug". Overrides
    /// `log_level` in the config file.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config.clone(), self.data.clone())
    }

    /// Loads the client config, then sets up logging with the level from the
    /// command line or, failing that, from the config.
    pub fn build_factory(&self) -> Result<ClientFactory> {
        let ps = self.build_path_set()?;
        let factory = ClientFactory::load(&ps)?;
        logs::init(self.log_level(factory.config()))?;
        Ok(factory)
    }

    fn log_level<'a>(&'a self, cfg: &'a ClientConfig) -> &'a str {
        match self.log_level.as_ref() {
            Some(level) => level.as_str(),
            None => cfg.log_level.as_str(),
        }
    }
}

pub fn display_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

/// Manage the session and profile of an API account from the command line.
#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Config(config::ShowConfigArgs),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Profile(profile::ProfileCommand),
    Refresh(refresh::RefreshArgs),
    Register(register::RegisterArgs),
    Status(status::StatusArgs),
}

#[async_trait]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Config(args) => args.run().await,
            Commands::Login(args) => args.run().await,
            Commands::Logout(args) => args.run().await,
            Commands::Profile(args) => args.run().await,
            Commands::Refresh(args) => args.run().await,
            Commands::Register(args) => args.run().await,
            Commands::Status(args) => args.run().await,
        }
    }
}
