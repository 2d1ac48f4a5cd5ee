use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use ragdesk_analytics::{
    AnalyticsEngine, Column, FilterModel, SelectionChanged, SelectionSource, ViewMode, ViewRows,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::CliConfig;

const RECORD_COLUMNS: [Column; 6] = [
    Column::Id,
    Column::Source,
    Column::Page,
    Column::RelevanceScore,
    Column::Quarantine,
    Column::AccessRoles,
];

const DOCUMENT_COLUMNS: [Column; 6] = [
    Column::Source,
    Column::ChunksFound,
    Column::RelevanceScore,
    Column::TotalNumberUsed,
    Column::Quarantine,
    Column::AccessRoles,
];

#[derive(Debug, Parser)]
pub struct AnalyticsCli {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Group a record dump by source document
    Group(GroupArgs),

    /// Show a record dump the way the grid would
    View(ViewArgs),

    /// Print the scatter plot series as JSON
    Plot(ViewArgs),
}

#[derive(Debug, Parser)]
pub struct GroupArgs {
    /// JSON array of records as returned by the analytics endpoint
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Print the aggregates as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ViewArgs {
    /// JSON array of records as returned by the analytics endpoint
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// `document` or `page_segment`; defaults to the configured view
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ViewMode>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Row ids to check, comma separated
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub select: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Column id to filter on, e.g. `source`
    #[arg(long, value_name = "COLUMN", requires = "text")]
    pub column: Option<String>,

    /// Substring the column must contain
    #[arg(long, value_name = "TEXT", requires = "column")]
    pub text: Option<String>,
}

impl AnalyticsCli {
    pub fn run(self, config: &CliConfig) -> Result<()> {
        match self.command {
            AnalyticsCommand::Group(args) => run_group(args, config),
            AnalyticsCommand::View(args) => run_view(args, config),
            AnalyticsCommand::Plot(args) => run_plot(args, config),
        }
    }
}

fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))
}

fn load_engine(path: &Path, config: &CliConfig) -> Result<AnalyticsEngine> {
    let rows = read_rows(path)?;
    let mut engine = AnalyticsEngine::new(config.analytics.clone());
    engine
        .load(&rows)
        .with_context(|| format!("Failed to load records from {}", path.display()))?;
    Ok(engine)
}

fn run_group(args: GroupArgs, config: &CliConfig) -> Result<()> {
    let mut engine = load_engine(&args.input, config)?;
    engine.set_view_mode(ViewMode::Document)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(engine.documents())?);
        return Ok(());
    }

    println!(
        "{} {} records in {} documents\n",
        "✓".bright_green(),
        engine.records().len().bright_cyan(),
        engine.documents().len().bright_cyan()
    );
    print_table(&engine.rows(), &DOCUMENT_COLUMNS, &[]);
    Ok(())
}

/// Load, switch view, filter and select as the grid would.
fn prepare_view(args: ViewArgs, config: &CliConfig) -> Result<AnalyticsEngine> {
    let mut engine = load_engine(&args.input, config)?;
    if let Some(mode) = args.mode {
        engine.set_view_mode(mode)?;
    }
    if let (Some(column), Some(text)) = (args.filter.column, args.filter.text) {
        engine
            .apply_filter(FilterModel::new().with(column, text))
            .context("Failed to apply filter")?;
    }
    if !args.select.is_empty() {
        let outcome = engine
            .on_selection_changed(SelectionChanged {
                ids: args.select,
                source: SelectionSource::Api,
            })
            .context("Failed to select rows")?;
        if let Some(notice) = outcome.notice {
            eprintln!("{} {notice}", "!".bright_yellow());
        }
        engine.commit_view();
    }
    Ok(engine)
}

fn run_view(args: ViewArgs, config: &CliConfig) -> Result<()> {
    let engine = prepare_view(args, config)?;
    let rows = engine.rows();
    let columns: &[Column] = match engine.mode() {
        ViewMode::Document => &DOCUMENT_COLUMNS,
        ViewMode::PageSegment => &RECORD_COLUMNS,
    };

    if rows.is_empty() {
        println!("{} No rows match", "✗".bright_red());
        return Ok(());
    }
    println!(
        "{} {} rows ({} view)\n",
        "✓".bright_green(),
        rows.len().bright_cyan(),
        engine.mode()
    );
    print_table(&rows, columns, engine.selection());
    Ok(())
}

fn run_plot(args: ViewArgs, config: &CliConfig) -> Result<()> {
    let engine = prepare_view(args, config)?;
    let plot = engine.scatter().context("Failed to build plot")?;
    println!("{}", serde_json::to_string_pretty(&plot)?);
    Ok(())
}

fn print_table(rows: &ViewRows<'_>, columns: &[Column], selected: &[String]) {
    let cells: Vec<Vec<String>> = columns.iter().map(|column| rows.cells(*column)).collect();
    let widths: Vec<usize> = columns
        .iter()
        .zip(&cells)
        .map(|(column, values)| {
            values
                .iter()
                .map(String::len)
                .chain([column.header().len()])
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.header()))
        .collect();
    println!("  {}", header.join("  ").bright_blue());

    for (row, id) in rows.ids().into_iter().enumerate() {
        let marker = if selected.iter().any(|selected| selected == id) {
            "*"
        } else {
            " "
        };
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(values, width)| format!("{:<width$}", values[row]))
            .collect();
        println!("{marker} {}", line.join("  "));
    }
}
