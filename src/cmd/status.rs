use std::time::{Duration, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;
use authsync::session::SessionStatus;
use authsync::store::StoredIdentity;
use clap::Args;
use serde::Serialize;

use super::{display_json, ConfigArgs, RunCommand};

/// Show whether a session is held locally. The server is not asked, so a
/// revoked token still shows as authenticated.
#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Serialize)]
struct StatusOutput {
    status: SessionStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<StoredIdentity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    cached: Option<String>,
}

#[async_trait]
impl RunCommand for StatusArgs {
    async fn run(&self) -> Result<()> {
        let session = self.config.build_factory()?.build_session()?;
        let status = session.status();
        let user = match status {
            SessionStatus::Authenticated => session.identity(),
            SessionStatus::Anonymous => None,
        };
        let cached = user.as_ref().map(|u| format_cached(u.saved_at));
        display_json(StatusOutput {
            status,
            user,
            cached,
        })
    }
}

fn format_cached(saved_at: u64) -> String {
    let time = UNIX_EPOCH + Duration::from_secs(saved_at);
    humantime::format_rfc3339_seconds(time).to_string()
}
