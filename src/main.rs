use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use jobboard::board::models::{JobPatch, Stage};
use jobboard::config::BoardConfig;

mod cmd;

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(version, about = "Track job applications across pipeline stages")]
pub struct Cli {
    /// Force debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding `.jobboard/` (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Job collection file. Overrides jobboard.toml and JOBBOARD_DATA_FILE.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create `.jobboard/` with a default config and an empty collection
    Init {
        /// Seed the collection with sample applications
        #[arg(long)]
        demo: bool,
    },
    /// Show the board: one column per stage
    Board {
        /// Print the board as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the pipeline stages in column order
    Stages,
    /// List applications
    List {
        /// Only show applications in this stage
        #[arg(long)]
        stage: Option<Stage>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an application
    Add {
        #[command(flatten)]
        fields: JobArgs,
        /// Fill in the form interactively
        #[arg(short, long)]
        interactive: bool,
    },
    /// Edit an application. Only the given fields change.
    Edit {
        id: String,
        #[command(flatten)]
        fields: JobArgs,
        /// Open the form pre-filled with the current values
        #[arg(short, long)]
        interactive: bool,
    },
    /// Move an application to another stage
    Move { id: String, stage: Stage },
    /// Delete an application
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Total applications and per-stage counts
    Summary {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP dashboard API
    Serve {
        /// Port to listen on (overrides jobboard.toml)
        #[arg(long)]
        port: Option<u16>,
        /// Open the dashboard in a browser
        #[arg(long)]
        open: bool,
        /// Development mode: permissive CORS
        #[arg(long)]
        dev: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Form fields as command-line flags.
#[derive(Args, Clone, Debug, Default)]
pub struct JobArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub status: Option<Stage>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl JobArgs {
    pub fn to_patch(&self) -> JobPatch {
        JobPatch {
            company_name: self.company.clone(),
            position_title: self.position.clone(),
            status: self.status,
            location: self.location.clone(),
            salary_range: self.salary.clone(),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Subcommand, Clone, Copy)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Create a default jobboard.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config = BoardConfig::with_cli_args(project_dir, cli.data_file.clone())?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.toml.logging.level.as_str()
    };
    let _log_guard = jobboard::logging::init_logging(
        level,
        &config.toml.logging.format,
        config.log_file().as_deref(),
    )?;

    match &cli.command {
        Commands::Init { demo } => cmd::cmd_init(&config, *demo)?,
        Commands::Board { json } => cmd::cmd_board(&config, *json)?,
        Commands::Stages => cmd::cmd_stages(),
        Commands::List { stage, json } => cmd::cmd_list(&config, *stage, *json)?,
        Commands::Add {
            fields,
            interactive,
        } => cmd::cmd_add(&config, fields, *interactive)?,
        Commands::Edit {
            id,
            fields,
            interactive,
        } => cmd::cmd_edit(&config, id, fields, *interactive)?,
        Commands::Move { id, stage } => cmd::cmd_move(&config, id, *stage)?,
        Commands::Delete { id, yes } => cmd::cmd_delete(&config, id, *yes)?,
        Commands::Summary { json } => cmd::cmd_summary(&config, *json)?,
        Commands::Serve { port, open, dev } => cmd::cmd_serve(&config, *port, *open, *dev).await?,
        Commands::Config { command } => cmd::cmd_config(&config, *command)?,
    }

    Ok(())
}
