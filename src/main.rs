//! Rapport CLI entry point.

use clap::Parser;

use rapport::cli::{commands, handle_error, Cli, Commands};
use rapport::infrastructure::config::ConfigLoader;
use rapport::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, cli.json).await,
        Commands::Profile(args) => commands::profile::execute(args, config, cli.json).await,
        Commands::Signal(args) => commands::signal::execute(args, config, cli.json).await,
        Commands::Question(args) => commands::question::execute(args, config, cli.json).await,
        Commands::Context(args) => commands::context::execute(args, config, cli.json).await,
        Commands::Reset(args) => commands::reset::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
