//! `rapport context`: preview the context injected for a message.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::app::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AssembledContext, Config};

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// The incoming user message
    pub message: String,

    /// Conversation to draw recent history and intent from
    #[arg(short, long)]
    pub conversation: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ContextOutput {
    pub context: AssembledContext,
    pub prompt_text: String,
}

impl CommandOutput for ContextOutput {
    fn to_human(&self) -> String {
        if self.prompt_text.is_empty() {
            return "Nothing is known yet; the context is empty.".to_string();
        }
        format!("{}\n(~{} tokens)", self.prompt_text, self.context.size_estimate)
    }
}

pub async fn execute(args: ContextArgs, config: Config, json_mode: bool) -> Result<()> {
    let app = App::open(config).await?;

    let (conversation_id, recent) = match args.conversation {
        Some(id) => {
            app.conversations
                .get(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Conversation not found: {id}"))?;
            let recent = app
                .conversations
                .recent_messages(id, app.config.context.history_messages)
                .await?;
            (id, recent)
        }
        None => (Uuid::nil(), Vec::new()),
    };

    let context = app
        .assembler
        .assemble(&args.message, &recent, conversation_id)
        .await
        .context("Failed to assemble context")?;
    let prompt_text = context.format_for_prompt();
    output(&ContextOutput { context, prompt_text }, json_mode);
    Ok(())
}
