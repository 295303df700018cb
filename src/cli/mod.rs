//! Command-line interface over the profile engine.

pub mod app;
pub mod commands;
pub mod display;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{
    context::ContextArgs, init::InitArgs, profile::ProfileArgs, question::QuestionArgs,
    reset::ResetArgs, signal::SignalArgs,
};

#[derive(Parser, Debug)]
#[command(name = "rapport", version, about = "Evidence-gated conversational profile engine")]
pub struct Cli {
    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .rapport/ with a default config and an empty database
    Init(InitArgs),
    /// Inspect profile completeness and elicitation priorities
    Profile(ProfileArgs),
    /// Record, list and trace signals
    Signal(SignalArgs),
    /// Browse the question bank
    Question(QuestionArgs),
    /// Preview the context assembled for a message
    Context(ContextArgs),
    /// Delete the entire profile
    Reset(ResetArgs),
}

/// Print an error and exit with a failure status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
