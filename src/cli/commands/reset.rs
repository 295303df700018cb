//! `rapport reset`: wipe every signal, profile entity and evidence row.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::app::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::ResetReport;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm the reset; nothing is deleted without it
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetOutput {
    pub success: bool,
    pub message: String,
    pub removed: Option<ResetReport>,
}

impl CommandOutput for ResetOutput {
    fn to_human(&self) -> String {
        match &self.removed {
            Some(r) => format!(
                "{}\n  signals: {}\n  entities: {}\n  evidence: {}",
                self.message, r.signals, r.entities, r.evidence
            ),
            None => self.message.clone(),
        }
    }
}

pub async fn execute(args: ResetArgs, config: Config, json_mode: bool) -> Result<()> {
    if !args.yes {
        let out = ResetOutput {
            success: false,
            message: "Refusing to reset without --yes. This deletes the whole profile.".to_string(),
            removed: None,
        };
        output(&out, json_mode);
        return Ok(());
    }

    let app = App::open(config).await?;
    let report = app.signals.reset_profile().await.context("Failed to reset profile")?;
    let out = ResetOutput {
        success: true,
        message: "Profile reset.".to_string(),
        removed: Some(report),
    };
    output(&out, json_mode);
    Ok(())
}
