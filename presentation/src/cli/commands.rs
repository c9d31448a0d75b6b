//! CLI command definitions

use clap::{Parser, ValueEnum};
use conductor_domain::{OutputFormat, PlanningMode};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Human-readable progress report
    Text,
    /// Tagged markup, as the planner sees it
    Markup,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Markup => OutputFormat::Markup,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// Planning mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Plan everything up front, then execute
    Full,
    /// Plan one step at a time, replanning after each
    Iterative,
}

impl From<ModeArg> for PlanningMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Full => PlanningMode::Full,
            ModeArg::Iterative => PlanningMode::Iterative,
        }
    }
}

/// CLI arguments for conductor
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(author, version, about = "Plan-execute-replan orchestration over named agents")]
#[command(long_about = r#"
Conductor breaks an objective into steps with a planner, runs each step's
tasks on named agents in parallel, and feeds the results back to the planner.

Planning modes:
  full        The planner returns the whole plan once
  iterative   The planner returns one step at a time until it reports completion

Configuration files are loaded from (in priority order):
1. CONDUCTOR_* environment variables
2. --config <path>     Explicit config file
3. ./conductor.toml    Project-level config
4. ~/.config/conductor/config.toml   Global config

Example:
  conductor "Organize 3 video files"
  conductor --mode iterative --max-iterations 5 "Clean up the downloads folder"
  conductor --playback replies.txt --output json "Organize 3 video files"
"#)]
pub struct Cli {
    /// The objective to accomplish (not required with --show-config)
    pub objective: Option<String>,

    /// Planning mode (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Maximum number of iterative steps (overrides config)
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Replay planner replies from a file instead of running the planner
    #[arg(long, value_name = "PATH")]
    pub playback: Option<PathBuf>,

    /// Directory for the tracing log and run transcript
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
