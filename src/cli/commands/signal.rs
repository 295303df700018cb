//! Signal CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::app::App;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{
    is_known_dimension, Config, Evidence, EvidenceTarget, Signal, SignalObservation, UpsertOutcome,
    DEFAULT_INCREMENT,
};

#[derive(Args, Debug)]
pub struct SignalArgs {
    #[command(subcommand)]
    pub command: SignalCommands,
}

#[derive(Subcommand, Debug)]
pub enum SignalCommands {
    /// Record a grounded observation for a dimension
    Set {
        /// Dimension key, e.g. risk_tolerance or moral.care
        dimension: String,
        /// Observed value
        value: String,
        /// Verbatim quote supporting the observation
        #[arg(short, long)]
        quote: Option<String>,
        /// Source message id (a fresh id is used for manual entries)
        #[arg(long)]
        message_id: Option<Uuid>,
        /// Confidence increment for a repeat observation
        #[arg(long, default_value_t = DEFAULT_INCREMENT)]
        increment: f64,
    },
    /// List signals, optionally under a dimension prefix
    List {
        /// Dimension prefix, e.g. big_five.
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
    /// Show evidence for a signal (id or dimension) or another profile record
    Evidence {
        /// Signal id or dimension, or the id of the record named by --target
        key: String,
        /// Target type: signal, value, challenge, goal, maslow, intent
        #[arg(short, long, default_value = "signal")]
        target: String,
    },
}

#[derive(Debug, Serialize)]
pub struct SignalSetOutput {
    pub applied: bool,
    pub message: String,
    pub signal: Option<Signal>,
}

impl CommandOutput for SignalSetOutput {
    fn to_human(&self) -> String {
        match &self.signal {
            Some(s) => format!(
                "{}\n  {} = {} (confidence {:.2}, evidence {})",
                self.message, s.dimension, s.value, s.confidence, s.evidence_count
            ),
            None => self.message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignalListOutput {
    pub signals: Vec<Signal>,
    pub total: usize,
}

impl CommandOutput for SignalListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["dimension", "value", "confidence", "evidence", "updated"]);
        for s in &self.signals {
            table.add_row(vec![
                s.dimension.clone(),
                truncate(&s.value, 30),
                format!("{:.2}", s.confidence),
                s.evidence_count.to_string(),
                s.last_updated.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        render_list("signal", &table, self.total)
    }
}

#[derive(Debug, Serialize)]
pub struct EvidenceOutput {
    pub key: String,
    pub evidence: Vec<Evidence>,
}

impl CommandOutput for EvidenceOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["recorded", "message", "quote"]);
        for e in &self.evidence {
            table.add_row(vec![
                e.created_at.format("%Y-%m-%d %H:%M").to_string(),
                e.source_message_id.to_string()[..8].to_string(),
                format!("\"{}\"", truncate(&e.quote, 60)),
            ]);
        }
        render_list("evidence row", &table, self.evidence.len())
    }
}

pub async fn execute(args: SignalArgs, config: Config, json_mode: bool) -> Result<()> {
    let app = App::open(config).await?;

    match args.command {
        SignalCommands::Set { dimension, value, quote, message_id, increment } => {
            if !is_known_dimension(&dimension) {
                anyhow::bail!("Unknown dimension: {dimension}");
            }
            let mut observation = SignalObservation::new(&dimension, value).with_increment(increment);
            if let Some(quote) = quote {
                observation = observation.grounded(quote, message_id.unwrap_or_else(Uuid::new_v4));
            }
            let outcome = app.signals.upsert(observation).await.context("Failed to record signal")?;
            let message = match &outcome {
                UpsertOutcome::Created(_) => format!("Signal created: {dimension}"),
                UpsertOutcome::Updated(_) => format!("Signal updated: {dimension}"),
                UpsertOutcome::Ungrounded => "Observation dropped: a --quote is required".to_string(),
            };
            let out = SignalSetOutput {
                applied: outcome.is_applied(),
                message,
                signal: outcome.signal().cloned(),
            };
            output(&out, json_mode);
        }
        SignalCommands::List { prefix } => {
            let signals = app.signals.list(&prefix).await?;
            output(&SignalListOutput { total: signals.len(), signals }, json_mode);
        }
        SignalCommands::Evidence { key, target } => {
            let target = EvidenceTarget::from_str(&target)
                .ok_or_else(|| anyhow::anyhow!("Invalid target type: {target}"))?;
            let evidence = if target == EvidenceTarget::Signal {
                app.signals.evidence_for(&key).await?
            } else {
                let id = Uuid::parse_str(&key).with_context(|| format!("Invalid record id: {key}"))?;
                app.signals.evidence_for_target(target, id).await?
            };
            output(&EvidenceOutput { key, evidence }, json_mode);
        }
    }

    Ok(())
}
