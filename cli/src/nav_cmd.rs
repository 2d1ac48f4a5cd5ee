use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use ragdesk_navigation::{NavCatalog, NavSection, NavTarget, Role};
use ragdesk_session::{NavigationController, ProfileStore};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{CliConfig, load_catalog};

#[derive(Debug, Parser)]
pub struct NavCli {
    #[command(subcommand)]
    pub command: NavCommand,
}

#[derive(Debug, Subcommand)]
pub enum NavCommand {
    /// List the sidebar sections and tasks a role can see
    Show(ShowArgs),

    /// Select a sidebar task and print where it leads
    Select(SelectArgs),

    /// Show the home page cards, optionally opening one
    Cards(CardsArgs),

    /// List the profile picker options
    Profiles,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Role to render for, e.g. "Guest" or "Document Owner"
    #[arg(short, long, default_value = "Admin")]
    pub role: String,

    /// Navigation catalog (TOML or JSON); overrides the config file
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print the visible sections as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct SelectArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Index into the visible section list
    #[arg(value_name = "SECTION")]
    pub section: usize,

    /// Index into the section's task list
    #[arg(value_name = "TASK")]
    pub subsection: usize,
}

#[derive(Debug, Parser)]
pub struct CardsArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Card to open (0 is the Home banner)
    #[arg(long, value_name = "INDEX")]
    pub open: Option<usize>,

    /// Task of the open card to choose
    #[arg(long, value_name = "INDEX", requires = "open")]
    pub task: Option<usize>,
}

impl NavCli {
    pub fn run(self, config: &CliConfig) -> Result<()> {
        match self.command {
            NavCommand::Show(args) => run_show(args, config),
            NavCommand::Select(args) => run_select(args, config),
            NavCommand::Cards(args) => run_cards(args, config),
            NavCommand::Profiles => {
                run_profiles();
                Ok(())
            }
        }
    }
}

impl CatalogArgs {
    fn controller(&self, config: &CliConfig) -> Result<(ProfileStore, NavigationController)> {
        let path = self.catalog.as_deref().or(config.catalog.as_deref());
        let catalog: Arc<NavCatalog> = Arc::new(load_catalog(path)?);
        let store = ProfileStore::new(Role::parse(&self.role), Role::DEFAULT_OPTIONS);
        let controller = NavigationController::new(catalog, store.subscribe());
        Ok((store, controller))
    }
}

fn run_show(args: ShowArgs, config: &CliConfig) -> Result<()> {
    let (store, controller) = args.catalog.controller(config)?;
    let sidebar = controller.sidebar();

    if args.json {
        let json = serde_json::to_string_pretty(sidebar.visible_sections())?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "{} Navigation for {}",
        "▶".bright_blue(),
        store.current().bright_cyan()
    );
    if let Some(home) = sidebar.home() {
        println!("  {} {}  {}", home.icon.glyph(), home.title, home.route.bright_black());
    }
    if sidebar.visible_sections().is_empty() {
        println!("{} No sections visible", "✗".bright_red());
        return Ok(());
    }
    for (index, section) in sidebar.visible_sections().iter().enumerate() {
        print_section(index, section);
    }
    Ok(())
}

fn print_section(index: usize, section: &NavSection) {
    println!(
        "{}. {} {}",
        index.to_string().bright_yellow(),
        section.icon.glyph(),
        section.title.bright_cyan()
    );
    for (task, subsection) in section.active_subsections() {
        println!(
            "   {}. {}  {}",
            task,
            subsection.title,
            subsection.route.bright_black()
        );
    }
}

fn print_target(target: &NavTarget) {
    println!("{} {}", "✓".bright_green(), target.title);
    println!("  route: {}", target.route);
    println!("  persona: {}", target.persona);
    if !target.description.is_empty() {
        println!("  {}", target.description.dimmed());
    }
}

fn run_select(args: SelectArgs, config: &CliConfig) -> Result<()> {
    let (_store, mut controller) = args.catalog.controller(config)?;
    let target = controller
        .sidebar_mut()
        .select_subsection(args.section, args.subsection)
        .context("Failed to select task")?;
    print_target(&target);
    Ok(())
}

fn run_cards(args: CardsArgs, config: &CliConfig) -> Result<()> {
    let (_store, mut controller) = args.catalog.controller(config)?;

    let Some(open) = args.open else {
        for (index, card) in controller.cards().cards().iter().enumerate() {
            println!(
                "{}. {} {}",
                index.to_string().bright_yellow(),
                card.icon.glyph(),
                card.title.bright_cyan()
            );
            if !card.description.is_empty() {
                println!("   {}", card.description.dimmed());
            }
        }
        return Ok(());
    };

    let cards = controller.cards_mut();
    let title = cards
        .click_card(open)
        .context("Failed to open card")?
        .map(|card| card.title.clone())
        .unwrap_or_default();
    println!("{} {}", "▶".bright_blue(), title);

    match args.task {
        Some(task) => {
            let target = cards.choose_task(task).context("Failed to choose task")?;
            print_target(&target);
        }
        None => {
            let tasks = cards.tasks();
            if tasks.is_empty() {
                println!("  No tasks");
            }
            for (index, subsection) in tasks {
                println!("   {}. {}", index, subsection.title);
            }
        }
    }
    Ok(())
}

fn run_profiles() {
    let store = ProfileStore::default();
    for option in store.options() {
        let marker = if Role::parse(&option.label) == store.current() {
            "*"
        } else {
            " "
        };
        println!("{marker} {}  {}", option.label, option.value.bright_black());
    }
}
