//! Profile CLI commands: completeness and priorities.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::app::App;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Axis, AxisCompleteness, AxisPriority, Config};

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show completeness for every axis, or one axis by name
    Completeness {
        /// Axis name, e.g. risk_tolerance
        #[arg(short, long)]
        axis: Option<String>,
    },
    /// Show elicitation priorities and whether the baseline is met
    Priorities,
}

#[derive(Debug, Serialize)]
pub struct CompletenessOutput {
    pub axes: Vec<AxisCompleteness>,
}

impl CommandOutput for CompletenessOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["axis", "tier", "score", "reason"]);
        for axis in &self.axes {
            table.add_row(vec![
                axis.axis.clone(),
                Axis::from_str(&axis.axis).map_or_else(|| "-".to_string(), |a| a.tier().number().to_string()),
                format!("{:.2}", axis.score.value()),
                axis.reason.clone(),
            ]);
        }
        render_list("axis", &table, self.axes.len())
    }
}

#[derive(Debug, Serialize)]
pub struct PrioritiesOutput {
    pub priorities: Vec<AxisPriority>,
    pub highest: Option<String>,
    pub baseline_met: bool,
}

impl CommandOutput for PrioritiesOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["axis", "tier", "completeness", "priority"]);
        for p in &self.priorities {
            table.add_row(vec![
                p.axis.as_str().to_string(),
                p.axis.tier().number().to_string(),
                format!("{:.2}", p.completeness),
                format!("{:.2}", p.priority),
            ]);
        }
        let mut lines = vec![render_list("axis", &table, self.priorities.len())];
        lines.push(String::new());
        match &self.highest {
            Some(axis) => lines.push(format!("Next axis to explore: {axis}")),
            None => lines.push("Every axis is complete.".to_string()),
        }
        lines.push(format!("Baseline met: {}", if self.baseline_met { "yes" } else { "no" }));
        lines.join("\n")
    }
}

pub async fn execute(args: ProfileArgs, config: Config, json_mode: bool) -> Result<()> {
    let app = App::open(config).await?;

    match args.command {
        ProfileCommands::Completeness { axis } => {
            let axes = match axis {
                Some(name) => vec![app
                    .guided
                    .engine()
                    .completeness_by_name(&name)
                    .await
                    .context("Failed to compute completeness")?],
                None => app
                    .guided
                    .engine()
                    .all_axis_completeness()
                    .await
                    .context("Failed to compute completeness")?,
            };
            output(&CompletenessOutput { axes }, json_mode);
        }
        ProfileCommands::Priorities => {
            let priorities = app.guided.calculate_all_priorities().await?;
            let mut sorted = priorities.clone();
            sorted.sort_by(|a, b| b.priority.total_cmp(&a.priority));
            let out = PrioritiesOutput {
                highest: app.guided.highest_priority_axis().await?.map(|a| a.as_str().to_string()),
                baseline_met: app.guided.baseline_met().await?,
                priorities: sorted,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
