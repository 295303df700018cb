//! Question bank CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::app::App;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Axis, AxisTier, Config, Question};
use crate::services::QuestionBank;

#[derive(Args, Debug)]
pub struct QuestionArgs {
    #[command(subcommand)]
    pub command: QuestionCommands,
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    /// List questions, filtered by axis, tier or text
    List {
        #[arg(short, long)]
        axis: Option<String>,
        /// Tier number (1-4)
        #[arg(short, long)]
        tier: Option<u8>,
        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Suggest a question for the highest-priority axis
    Suggest {
        /// Pick a different question for the same axis
        #[arg(short, long, default_value_t = 0)]
        rotation: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct QuestionListOutput {
    pub questions: Vec<Question>,
}

impl CommandOutput for QuestionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "axis", "type", "question"]);
        for q in &self.questions {
            table.add_row(vec![q.id, q.axis.as_str(), q.question_type.as_str(), q.text]);
        }
        render_list("question", &table, self.questions.len())
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestOutput {
    pub axis: Option<Axis>,
    pub question: Option<Question>,
}

impl CommandOutput for SuggestOutput {
    fn to_human(&self) -> String {
        match (&self.axis, &self.question) {
            (Some(axis), Some(q)) => format!("{} ({}):\n  {}", axis.label(), q.id, q.text),
            _ => "Every axis is complete; nothing to ask.".to_string(),
        }
    }
}

/// Apply the list filters; they combine with AND.
pub fn filter_questions(
    bank: &QuestionBank,
    axis: Option<Axis>,
    tier: Option<AxisTier>,
    search: Option<&str>,
) -> Vec<Question> {
    bank.search(search.unwrap_or(""))
        .into_iter()
        .filter(|q| axis.is_none_or(|a| q.axis == a))
        .filter(|q| tier.is_none_or(|t| q.tier() == t))
        .copied()
        .collect()
}

pub async fn execute(args: QuestionArgs, config: Config, json_mode: bool) -> Result<()> {
    let bank = QuestionBank::default();

    match args.command {
        QuestionCommands::List { axis, tier, search } => {
            let axis = match axis {
                Some(name) => Some(Axis::from_str(&name).ok_or_else(|| anyhow::anyhow!("Unknown axis: {name}"))?),
                None => None,
            };
            let tier = match tier {
                Some(n) => Some(AxisTier::from_number(n).ok_or_else(|| anyhow::anyhow!("Tier must be 1-4, got {n}"))?),
                None => None,
            };
            let questions = filter_questions(&bank, axis, tier, search.as_deref());
            output(&QuestionListOutput { questions }, json_mode);
        }
        QuestionCommands::Suggest { rotation } => {
            let app = App::open(config).await?;
            let axis = app.guided.highest_priority_axis().await?;
            let question = axis.and_then(|a| bank.select(a, rotation)).copied();
            output(&SuggestOutput { axis, question }, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_combine() {
        let bank = QuestionBank::default();
        let essential = filter_questions(&bank, None, Some(AxisTier::Essential), None);
        assert!(!essential.is_empty());
        assert!(essential.iter().all(|q| q.tier() == AxisTier::Essential));

        let risk = filter_questions(&bank, Some(Axis::RiskTolerance), None, Some("SALARY"));
        assert_eq!(risk.len(), 1);
        assert_eq!(risk[0].axis, Axis::RiskTolerance);
    }
}
