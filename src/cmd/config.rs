use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{display_json, ConfigArgs, RunCommand};

/// Display the client configuration in use, with defaults filled in, as JSON.
#[derive(Args)]
pub struct ShowConfigArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        display_json(factory.config())
    }
}
