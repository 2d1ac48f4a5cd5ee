use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use ragdesk_analytics::{
    AnalyticsEngine, EditableField, FieldValue, SelectionChanged, SelectionSource, ViewMode,
};
use ragdesk_backend_client::{BackendConfig, HttpBackend, TaskStatusSource, wait_for_terminal};
use ragdesk_session::{AnalyticsSession, MutationOutcome, SessionError};
use std::sync::Arc;

use crate::config::CliConfig;

#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Backend base URL; overrides the config file
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl BackendArgs {
    fn config(&self, config: &CliConfig) -> BackendConfig {
        match &self.base_url {
            Some(base_url) => BackendConfig {
                base_url: base_url.clone(),
                ..config.backend.clone()
            },
            None => config.backend.clone(),
        }
    }

    fn connect(&self, config: &CliConfig) -> Result<HttpBackend> {
        HttpBackend::new(&self.config(config)).context("Failed to set up backend client")
    }
}

#[derive(Debug, Parser)]
pub struct FlagArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// View the ids refer to; sources in `document`, chunk ids in
    /// `page_segment`
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ViewMode>,

    /// Rows to change
    #[arg(value_name = "ID", required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Debug, Parser)]
pub struct RolesArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    #[arg(long, value_name = "MODE")]
    pub mode: Option<ViewMode>,

    /// Roles typed into the first row and painted onto the rest, comma
    /// separated. Without it the first row's current roles are saved.
    #[arg(long, value_name = "ROLES", value_delimiter = ',')]
    pub set: Option<Vec<String>>,

    #[arg(value_name = "ID", required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Debug, Parser)]
pub struct TaskCli {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Follow a task's status stream until it finishes
    Watch(WatchArgs),
}

#[derive(Debug, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    #[arg(value_name = "TASK_ID")]
    pub task_id: String,
}

impl TaskCli {
    pub async fn run(self, config: &CliConfig) -> Result<()> {
        match self.command {
            TaskCommand::Watch(args) => run_watch(args, config).await,
        }
    }
}

async fn open_session(
    backend: &BackendArgs,
    mode: Option<ViewMode>,
    config: &CliConfig,
) -> Result<AnalyticsSession<HttpBackend>> {
    let http = backend.connect(config)?;
    let session = AnalyticsSession::new(
        AnalyticsEngine::new(config.analytics.clone()),
        Arc::new(http),
    );
    let request = session.fetch_request(&config.analytics.user_id);
    session
        .refresh(&request)
        .await
        .map_err(|err| with_notice(err, "Fetch records"))?;
    if let Some(mode) = mode {
        session.engine().lock().set_view_mode(mode)?;
    }
    Ok(session)
}

/// Backend failures become the user-facing notice; everything else keeps
/// its own message.
fn with_notice(err: SessionError, action: &str) -> anyhow::Error {
    match err.user_notice(action) {
        Some(notice) => anyhow::anyhow!(notice),
        None => anyhow::Error::new(err).context(format!("{action} failed")),
    }
}

fn report(outcome: MutationOutcome, action: &str) {
    match outcome {
        MutationOutcome::Applied { records } => println!(
            "{} {action} applied to {} records",
            "✓".bright_green(),
            records.bright_cyan()
        ),
        MutationOutcome::NothingToSend => {
            println!("{} {action}: nothing to change", "✓".bright_green())
        }
    }
}

pub async fn run_flag(args: FlagArgs, config: &CliConfig, raise: bool) -> Result<()> {
    let session = open_session(&args.backend, args.mode, config).await?;
    let (action, outcome) = if raise {
        ("Quarantine", session.quarantine(&args.ids).await)
    } else {
        ("Unquarantine", session.unquarantine(&args.ids).await)
    };
    let outcome = outcome.map_err(|err| with_notice(err, action))?;
    report(outcome, action);
    Ok(())
}

pub async fn run_roles(args: RolesArgs, config: &CliConfig) -> Result<()> {
    let session = open_session(&args.backend, args.mode, config).await?;
    {
        let engine = session.engine();
        let mut engine = engine.lock();
        engine.on_selection_changed(SelectionChanged {
            ids: args.ids.clone(),
            source: SelectionSource::UserClick,
        })?;
        if let Some(roles) = args.set {
            engine.reconcile_bulk_selection_edit(
                &args.ids,
                &args.ids[0],
                EditableField::AccessRoles,
                FieldValue::Roles(roles),
            )?;
        }
    }
    let outcome = session
        .update_access_roles(&args.ids)
        .await
        .map_err(|err| with_notice(err, "Update access roles"))?;
    report(outcome, "Access role update");
    Ok(())
}

async fn run_watch(args: WatchArgs, config: &CliConfig) -> Result<()> {
    let http = args.backend.connect(config)?;
    let stream = http
        .subscribe(&args.task_id)
        .await
        .with_context(|| format!("Failed to subscribe to task {}", args.task_id))?;
    println!("{} Watching task {}", "▶".bright_blue(), args.task_id.bright_cyan());
    let result = wait_for_terminal(&args.task_id, stream).await?;
    println!("{} Task {} succeeded", "✓".bright_green(), args.task_id);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
