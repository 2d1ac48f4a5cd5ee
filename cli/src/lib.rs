mod analytics_cmd;
mod backend_cmd;
pub mod config;
mod nav_cmd;

pub use analytics_cmd::AnalyticsCli;
pub use backend_cmd::{FlagArgs, RolesArgs, TaskCli};
pub use config::CliConfig;
pub use nav_cmd::NavCli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect navigation and retrieval analytics from the terminal.
#[derive(Debug, Parser)]
#[command(name = "ragdesk", version)]
pub struct Cli {
    /// Config file (defaults to ./ragdesk.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what a role can navigate to
    Nav(NavCli),

    /// Group, filter and plot a record dump offline
    Analytics(AnalyticsCli),

    /// Quarantine records through the backend
    Quarantine(FlagArgs),

    /// Lift the quarantine flag through the backend
    Unquarantine(FlagArgs),

    /// Save access roles on records through the backend
    Roles(RolesArgs),

    /// Background task status
    Task(TaskCli),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = CliConfig::load(self.config.as_deref())?;
        match self.command {
            Command::Nav(cli) => cli.run(&config),
            Command::Analytics(cli) => cli.run(&config),
            Command::Quarantine(args) => backend_cmd::run_flag(args, &config, true).await,
            Command::Unquarantine(args) => backend_cmd::run_flag(args, &config, false).await,
            Command::Roles(args) => backend_cmd::run_roles(args, &config).await,
            Command::Task(cli) => cli.run(&config).await,
        }
    }
}
