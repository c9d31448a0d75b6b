//! CLI entrypoint for conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conductor_application::{
    AgentExecutor, AgentRegistry, AgentSynthesizer, NoProgress, NoRunLogger,
    OrchestrationOutcome, OrchestrationProgress, Orchestrator, PlannerGateway, RunLogger,
};
use conductor_domain::{ConfigIssue, OrchestrationState, OutputFormat, Severity};
use conductor_infrastructure::{
    CommandAgent, CommandPlanner, CommandSpec, ConfigLoader, EchoAgent, FileAgentKind,
    FileConfig, FilePlannerConfig, JsonlRunLogger, PlaybackPlanner,
};
use conductor_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        show_config(&cli)?;
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration (explicit --config > project > global > defaults)
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);

    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref())?;
    info!("Starting conductor");

    let issues = config.validate();
    report_config_issues(&issues);
    if ConfigIssue::has_errors(&issues) {
        bail!("Configuration has errors; fix them and try again");
    }

    let Some(objective) = cli.objective.clone() else {
        bail!("An objective is required. Example: conductor \"Organize 3 video files\"");
    };

    let format = config.output.format.unwrap_or_default();
    ConsoleFormatter::set_color(config.output.color && std::io::stdout().is_terminal());

    // === Dependency Injection ===
    let registry = build_registry(&config)?;
    let planner = build_planner(&config.planner)?;
    let run_logger = build_run_logger(&config);

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            ctrl_c_token.cancel();
        }
    });

    let mut orchestrator = Orchestrator::new(planner, registry.clone())
        .with_params(config.orchestrator.to_execution_params())
        .with_run_logger(run_logger)
        .with_cancellation(token);

    if let Some(ref name) = config.orchestrator.synthesizer {
        let agent = registry
            .get(name)
            .with_context(|| format!("Synthesizer agent '{}' is not registered", name))?;
        orchestrator = orchestrator.with_synthesizer(Arc::new(AgentSynthesizer::new(name, agent)));
    }

    if !cli.quiet && format == OutputFormat::Text {
        println!();
        println!("Objective: {}", objective);
        println!(
            "Mode: {}  Agents: {}",
            orchestrator.params().mode,
            registry.names().collect::<Vec<_>>().join(", ")
        );
        println!();
    }

    let progress = select_progress(cli.quiet || !config.output.show_progress);
    let outcome = orchestrator
        .run_with_progress(&objective, progress.as_ref())
        .await;

    println!("{}", ConsoleFormatter::render(&outcome, format));

    Ok(exit_code(&outcome))
}

/// CLI flags win over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.orchestrator.mode = conductor_domain::PlanningMode::from(mode).to_string();
    }
    if let Some(max) = cli.max_iterations {
        config.orchestrator.max_iterations = max;
    }
    if let Some(output) = cli.output {
        config.output.format = Some(output.into());
    }
    if let Some(ref playback) = cli.playback {
        config.planner.playback = Some(playback.clone());
    }
    if let Some(ref dir) = cli.log_dir {
        config.logging.dir = Some(dir.clone());
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    if cli.no_config {
        println!("Configuration files are disabled (--no-config)");
        return Ok(());
    }
    ConfigLoader::print_config_sources(cli.config.as_deref());

    let config = ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    println!();
    println!("{}", config.to_toml()?);

    let issues = config.validate();
    if !issues.is_empty() {
        println!("Issues:");
        for issue in &issues {
            println!("  {}", issue);
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level. `RUST_LOG` takes precedence.
///
/// With a log directory, events are also written to a daily-rolling file; the
/// returned guard flushes it on drop.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("conductor")
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("Cannot write logs to {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn report_config_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue),
            Severity::Warning => warn!("{}", issue),
        }
    }
}

fn build_registry(config: &FileConfig) -> Result<AgentRegistry> {
    let mut registry = AgentRegistry::new();

    for agent in &config.agents {
        let executor: Arc<dyn AgentExecutor> = match agent.kind {
            FileAgentKind::Echo => Arc::new(EchoAgent),
            FileAgentKind::Command => {
                let spec = CommandSpec::from_argv(&agent.command)
                    .with_context(|| format!("Agent '{}'", agent.name))?
                    .with_working_dir(agent.working_dir.clone())
                    .with_timeout(agent.timeout());
                Arc::new(CommandAgent::new(agent.name.clone(), spec))
            }
        };
        registry.register(agent.descriptor(), executor)?;
    }

    info!("Registered {} agent(s)", registry.len());
    Ok(registry)
}

/// Playback replies take precedence over a planner command.
fn build_planner(config: &FilePlannerConfig) -> Result<Arc<dyn PlannerGateway>> {
    if let Some(ref path) = config.playback {
        let planner = PlaybackPlanner::from_file(path)
            .with_context(|| format!("Cannot read playback file {}", path.display()))?;
        info!(
            "Replaying {} planner replies from {}",
            planner.remaining(),
            path.display()
        );
        return Ok(Arc::new(planner));
    }

    if config.command.is_empty() {
        bail!(
            "No planner configured. Set [planner] command in conductor.toml or pass --playback <file>."
        );
    }

    let spec = CommandSpec::from_argv(&config.command)
        .context("Planner")?
        .with_working_dir(config.working_dir.clone())
        .with_timeout(config.timeout());
    Ok(Arc::new(CommandPlanner::new(spec)))
}

/// Run transcript: `[logging] run_log`, else a timestamped file under the
/// log directory, else nothing.
fn build_run_logger(config: &FileConfig) -> Arc<dyn RunLogger> {
    let path: Option<PathBuf> = config.logging.run_log.clone().or_else(|| {
        config.logging.dir.as_ref().map(|dir| {
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            dir.join("runs").join(format!("run-{}.jsonl", stamp))
        })
    });

    match path.and_then(JsonlRunLogger::new) {
        Some(logger) => {
            info!("Writing run transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoRunLogger),
    }
}

fn select_progress(quiet: bool) -> Box<dyn OrchestrationProgress> {
    if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}

fn exit_code(outcome: &OrchestrationOutcome) -> ExitCode {
    match outcome.state {
        OrchestrationState::Complete => ExitCode::SUCCESS,
        OrchestrationState::MaxIterationsExceeded => ExitCode::from(2),
        OrchestrationState::Cancelled => ExitCode::from(130),
        _ => ExitCode::FAILURE,
    }
}
