pub mod commands;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::debug;

use crate::application::use_cases::open_project::LaunchConfig;
use crate::application::use_cases::register_repository::{
    RegisterOptions, RegisterRepositoryUseCase,
};
use crate::common::error::PjError;
use crate::common::result::{OptionExt, PjResult, ResultExt};
use crate::infrastructure::filesystem::config_store::{AppConfig, ConfigStore};
use crate::infrastructure::filesystem::project_store::ProjectStore;
use crate::infrastructure::scm::GitScm;
use crate::presentation::ui::{helpers, DisplayHelper};

use self::commands::{AddCommand, ListCommand, OpenCommand, ScanCommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// pj - open a project across fixed virtual-desktop workspaces
#[derive(Parser, Debug)]
#[command(name = "pj")]
#[command(about = "Open registered projects with editor, browser and chat on fixed workspaces")]
#[command(version, long_version = LONG_VERSION)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["name", "add", "all", "list"])
))]
pub struct Cli {
    /// Project to open: a full name or a unique part of one
    pub name: Option<String>,

    /// Register a Git repository (cloned into the projects directory) or an existing directory
    #[arg(long, value_name = "GIT_URL")]
    pub add: Option<String>,

    /// Register every Git repository found directly under the projects directory
    #[arg(long)]
    pub all: bool,

    /// List registered projects
    #[arg(long)]
    pub list: bool,

    /// With --all, rebuild records of projects that are already registered
    #[arg(long, requires = "all")]
    pub refresh: bool,

    /// Chat URL stored for newly registered projects
    #[arg(long, value_name = "URL", conflicts_with_all = ["name", "list"])]
    pub chat_url: Option<String>,

    /// Local development server URL stored for newly registered projects
    #[arg(long, value_name = "URL", conflicts_with_all = ["name", "list"])]
    pub localhost_url: Option<String>,

    /// Directory holding the projects and projects.json
    #[arg(long, env = "PJ_PROJECTS_DIR", value_name = "DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/pj/config.yaml)
    #[arg(long, env = "PJ_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let display = helpers::auto_display(self.cli.no_color);
        colored::control::set_override(display.use_color);

        match self.handle_command(&display).await {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(PjError::exit_code_for(&e).code());
            }
        }
    }

    async fn handle_command(&self, display: &DisplayHelper) -> anyhow::Result<()> {
        let config = ConfigStore::load(self.cli.config.as_deref())
            .map_err(PjError::from)
            .context("Failed to load configuration")?;
        let projects_dir = self.projects_dir(&config)?;
        debug!("Projects directory: {}", projects_dir.display());

        if self.cli.list {
            return Ok(ListCommand::new(projects_dir).execute(display)?);
        }

        if self.cli.all {
            let registrar = self.registrar(projects_dir);
            let command = ScanCommand::new(self.cli.refresh, self.register_options(&config));
            return command.execute(&registrar, display).with_context(|| {
                format!("Scan of {} incomplete", registrar.projects_dir().display())
            });
        }

        if let Some(target) = &self.cli.add {
            let registrar = self.registrar(projects_dir);
            let command = AddCommand::new(target.as_str(), self.register_options(&config));
            return Ok(command.execute(&registrar, display).await?);
        }

        let query = self
            .cli
            .name
            .as_deref()
            .ok_or_internal_error("No project name given")?;
        let command = OpenCommand::new(query, projects_dir, LaunchConfig::from_app_config(&config));
        Ok(command.execute(display).await?)
    }

    fn projects_dir(&self, config: &AppConfig) -> PjResult<PathBuf> {
        let dir = config.resolve_projects_dir(self.cli.projects_dir.as_deref())?;
        absolute(&dir)
    }

    fn registrar(&self, projects_dir: PathBuf) -> RegisterRepositoryUseCase {
        let store = ProjectStore::in_dir(&projects_dir);
        RegisterRepositoryUseCase::new(Box::new(GitScm::new()), store, projects_dir)
    }

    fn register_options(&self, config: &AppConfig) -> RegisterOptions {
        RegisterOptions::default()
            .with_chat_url(
                self.cli
                    .chat_url
                    .clone()
                    .unwrap_or_else(|| config.default_chat_url.clone()),
            )
            .with_localhost_url(
                self.cli
                    .localhost_url
                    .clone()
                    .unwrap_or_else(|| config.default_localhost_url.clone()),
            )
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn absolute(path: &Path) -> PjResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .with_filesystem_error("Cannot determine the current directory", None)?;
    Ok(cwd.join(path))
}
