//! CLI module for Waypoint
//!
//! Command-line interface definitions and handlers for the route planner.
//!
//! # Commands
//!
//! - `plan` - Resolve addresses and compute a route in one shot
//! - `suggest` - Print address suggestions for a query
//! - `shell` - Fill in the route form interactively
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Route from Paris to Lyon via Dijon
//! waypoint plan --origin "Paris" --destination "Lyon" --stop "Dijon"
//!
//! # Generate shell completions
//! waypoint completions bash > ~/.bash_completion.d/waypoint
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod plan;
pub mod shell;
pub mod suggest;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::WaypointConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Waypoint - Multi-stop route planner
#[derive(Parser, Debug)]
#[command(
    name = "waypoint",
    version,
    about = "Plan driving routes through multiple stops"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve addresses and compute a route
    Plan(PlanArgs),
    /// Show address suggestions for a query
    Suggest(SuggestArgs),
    /// Fill in the route form interactively
    Shell(ShellArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Starting address
    #[arg(short, long)]
    pub origin: String,

    /// Final address
    #[arg(short, long)]
    pub destination: String,

    /// Intermediate stop (repeatable, kept in order)
    #[arg(short, long = "stop")]
    pub stops: Vec<String>,

    /// Keep stops in the given order
    #[arg(long)]
    pub no_optimize: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "waypoint.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WAYPOINT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial address to complete
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "waypoint.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WAYPOINT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Keep stops in the given order
    #[arg(long)]
    pub no_optimize: bool,

    /// Output routes as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "waypoint.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WAYPOINT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "waypoint.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
///
/// A missing file is not an error: defaults apply. Environment overrides
/// come next, then the `--log-level` flag, and the result is validated.
pub fn load_config_with_overrides(
    path: &Path,
    log_level: Option<&str>,
) -> Result<WaypointConfig, Box<dyn std::error::Error>> {
    let mut config = if path.exists() {
        WaypointConfig::load(Some(path))?
    } else {
        WaypointConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }

    config.validate()?;
    Ok(config)
}
