//! Implementation of the `rapport init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::PROJECT_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote default configuration to {PROJECT_DIR}/config.yaml"));
        }
        if self.database_initialized {
            lines.push(format!("Database initialized at {PROJECT_DIR}/rapport.db"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&args.path)
    };
    let project_dir = target_path.join(PROJECT_DIR);

    if project_dir.exists() && !args.force {
        let out = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_initialized: false,
        };
        output(&out, json_mode);
        return Ok(());
    }

    if args.force && project_dir.exists() {
        fs::remove_dir_all(&project_dir)
            .await
            .with_context(|| format!("Failed to remove existing {PROJECT_DIR} directory"))?;
    }
    fs::create_dir_all(project_dir.join("logs"))
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize default configuration")?;
    fs::write(project_dir.join("config.yaml"), yaml)
        .await
        .context("Failed to write config.yaml")?;

    let db_url = format!("sqlite:{}", project_dir.join("rapport.db").display());
    initialize_database(&db_url, None).await.context("Failed to initialize database")?;

    let out = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_initialized: true,
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConfigLoader;

    #[tokio::test]
    async fn test_init_creates_config_and_database() {
        let dir = tempfile::tempdir().unwrap();
        execute(InitArgs { force: false, path: dir.path().to_path_buf() }, true).await.unwrap();

        let project_dir = dir.path().join(PROJECT_DIR);
        assert!(project_dir.join("rapport.db").exists());
        let config = ConfigLoader::load_from_file(project_dir.join("config.yaml")).unwrap();
        assert_eq!(config.guided_mode.max_turns, 7);
    }

    #[tokio::test]
    async fn test_second_init_without_force_leaves_project_alone() {
        let dir = tempfile::tempdir().unwrap();
        let args = || InitArgs { force: false, path: dir.path().to_path_buf() };
        execute(args(), true).await.unwrap();
        std::fs::write(dir.path().join(PROJECT_DIR).join("marker"), "x").unwrap();

        execute(args(), true).await.unwrap();
        assert!(dir.path().join(PROJECT_DIR).join("marker").exists());
    }
}
