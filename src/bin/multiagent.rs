//! Command-line entry point for the multi-agent development pipeline.
//!
//! Usage:
//!
//! ```text
//! multiagent [--root <dir>] <command>
//! ```
//!
//! `init` prepares `.multiagent/` and writes the configuration. `spec new`
//! scaffolds a task specification under `.multiagent/specs/`, `run` drives a
//! task through planning, implementation, testing, review, and merge, and
//! `resume` continues a blocked or interrupted task. `status`, `logs`, and
//! `worktree list` inspect what has happened; `cleanup` removes a task's
//! worktree.
//!
//! The exit code is 0 when the command succeeded and 1 when it failed or the
//! task ended blocked or failed.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use mockable::DefaultClock;
use multiagent::config::{
    adapters::fs::ConfigStore,
    domain::{
        AppConfig, ConfigError, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_PROVIDER,
        ProjectLayout,
    },
};
use multiagent::orchestration::{
    adapters::router::RouterTaskAgents,
    domain::TaskReport,
    services::{OrchestrationError, OrchestratorSettings, RunTaskRequest, TaskOrchestrator},
};
use multiagent::routing::{
    adapters::openai::OpenAiCompatibleProvider, domain::RoutingDomainError,
    services::ModelRouter,
};
use multiagent::specification::{
    adapters::fs::FileSpecificationCatalogue,
    domain::{SpecName, SpecificationDomainError},
    ports::{SpecificationCatalogue, SpecificationError},
};
use multiagent::task::{
    adapters::fs::FileTaskStateStore,
    domain::{TaskDomainError, TaskId},
};
use multiagent::telemetry::{self, LogFile, TelemetryError};
use multiagent::workspace::{
    adapters::git::GitWorkspaceManager,
    ports::{WorkspaceError, WorkspaceManager},
};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;

const DEFAULT_TAIL: usize = 50;

type Orchestrator = TaskOrchestrator<
    FileTaskStateStore<DefaultClock>,
    GitWorkspaceManager,
    RouterTaskAgents<OpenAiCompatibleProvider>,
    FileSpecificationCatalogue<DefaultClock>,
>;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
enum CliError {
    #[error("project root {path} is not accessible: {source}")]
    Root { path: String, source: io::Error },

    #[error("project root is not valid UTF-8: {0}")]
    NonUtf8Root(String),

    #[error("failed to prepare {path}: {source}")]
    Layout {
        path: Utf8PathBuf,
        source: io::Error,
    },

    #[error("failed to read log {path}: {source}")]
    Log {
        path: Utf8PathBuf,
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to build async runtime: {0}")]
    Runtime(io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Routing(#[from] RoutingDomainError),

    #[error(transparent)]
    SpecName(#[from] SpecificationDomainError),

    #[error(transparent)]
    Specification(#[from] SpecificationError),

    #[error(transparent)]
    TaskId(#[from] TaskDomainError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

#[derive(Debug, Parser)]
#[command(name = "multiagent", version, about = "Drive coding tasks through a team of model agents")]
struct Cli {
    /// Project root holding the repository and `.multiagent/`.
    #[arg(long, global = true, default_value = ".")]
    root: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create `.multiagent/` and write the configuration.
    Init(InitArgs),
    /// Manage task specifications.
    #[command(subcommand)]
    Spec(SpecCommand),
    /// Start a task from a specification.
    Run {
        /// Specification name.
        spec: String,
        /// QA iteration cap for this run.
        #[arg(long)]
        max_iterations: Option<u32>,
        /// Task identifier to use instead of a generated one.
        #[arg(long)]
        task_id: Option<String>,
    },
    /// Continue a blocked or interrupted task.
    Resume {
        /// Task identifier.
        task_id: String,
    },
    /// Show one task or every task.
    Status {
        /// Task identifier.
        task_id: Option<String>,
    },
    /// Print the tail of a task log, or of the latest log.
    Logs {
        /// Task identifier.
        task_id: Option<String>,
        /// Number of lines to print.
        #[arg(long, default_value_t = DEFAULT_TAIL)]
        tail: usize,
    },
    /// Inspect worktrees.
    #[command(subcommand)]
    Worktree(WorktreeCommand),
    /// Remove a task's worktree.
    Cleanup {
        /// Task identifier.
        task_id: String,
        /// Also delete the task branch.
        #[arg(long)]
        delete_branch: bool,
        /// Also delete the task record.
        #[arg(long)]
        forget: bool,
    },
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Completion provider label.
    #[arg(long, default_value = DEFAULT_PROVIDER)]
    provider: String,
    /// Root URL of the OpenAI-compatible API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Bearer token sent to the provider.
    #[arg(long, default_value = DEFAULT_API_KEY)]
    api_key: String,
}

#[derive(Debug, Subcommand)]
enum SpecCommand {
    /// Scaffold a new specification.
    New {
        /// Specification name.
        name: String,
    },
    /// List specifications.
    List,
}

#[derive(Debug, Subcommand)]
enum WorktreeCommand {
    /// List worktrees of the repository.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "command failed");
            let mut stderr = io::stderr().lock();
            let _ignored = writeln!(stderr, "error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let layout = ProjectLayout::new(resolve_root(&cli.root)?);
    let command = assign_task_id(cli.command);
    let _guard = init_telemetry(&layout, &command)?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(dispatch(&layout, command))
}

/// Picks the identifier of a new run up front so its log file is known
/// before any work starts.
fn assign_task_id(command: Command) -> Command {
    match command {
        Command::Run {
            spec,
            max_iterations,
            task_id: None,
        } => {
            let task_id = TaskId::generate(&spec).as_str().to_owned();
            Command::Run {
                spec,
                max_iterations,
                task_id: Some(task_id),
            }
        }
        other => other,
    }
}

fn resolve_root(raw: &str) -> Result<Utf8PathBuf, CliError> {
    let canonical = std::fs::canonicalize(raw).map_err(|source| CliError::Root {
        path: raw.to_owned(),
        source,
    })?;
    Utf8PathBuf::from_path_buf(canonical)
        .map_err(|path| CliError::NonUtf8Root(path.display().to_string()))
}

/// Task commands log to the task's own file; everything else shares the
/// session log. `init` and `logs` only log to the console.
fn init_telemetry(
    layout: &ProjectLayout,
    command: &Command,
) -> Result<Option<WorkerGuard>, CliError> {
    let file = match command {
        Command::Init(_) | Command::Logs { .. } => None,
        Command::Run { .. } | Command::Resume { .. } => Some(task_log(layout, command)),
        _ => Some(LogFile::session(layout.logs_dir())),
    };
    Ok(telemetry::init(file.as_ref())?)
}

fn task_log(layout: &ProjectLayout, command: &Command) -> LogFile {
    let task_id = match command {
        Command::Run {
            task_id: Some(raw), ..
        }
        | Command::Resume { task_id: raw } => TaskId::new(raw.as_str()).ok(),
        _ => None,
    };
    task_id.map_or_else(
        || LogFile::session(layout.logs_dir()),
        |id| LogFile::for_task(layout.logs_dir(), &id),
    )
}

async fn dispatch(layout: &ProjectLayout, command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Init(args) => init(layout, args),
        Command::Logs { task_id, tail } => logs(layout, task_id.as_deref(), tail),
        Command::Spec(SpecCommand::New { name }) => spec_new(layout, &name).await,
        Command::Spec(SpecCommand::List) => spec_list(layout).await,
        Command::Run {
            spec,
            max_iterations,
            task_id: requested,
        } => {
            let config = load_config(layout)?;
            let spec_name = SpecName::new(spec)?;
            let task_id = match requested {
                Some(raw) => TaskId::new(raw)?,
                None => TaskId::generate(spec_name.as_str()),
            };
            let mut request = RunTaskRequest::new(spec_name).with_task_id(task_id);
            if let Some(max) = max_iterations {
                request = request.with_max_iterations(max);
            }
            let report = orchestrator(layout, &config)?.run(request).await?;
            print_outcome(&report)
        }
        Command::Resume { task_id: raw } => {
            let config = load_config(layout)?;
            let task_id = TaskId::new(raw)?;
            let report = orchestrator(layout, &config)?.resume(&task_id).await?;
            print_outcome(&report)
        }
        Command::Status { task_id } => {
            let config = load_config(layout)?;
            status(&orchestrator(layout, &config)?, task_id).await
        }
        Command::Worktree(WorktreeCommand::List) => {
            let config = load_config(layout)?;
            worktree_list(&workspace_manager(layout, &config)).await
        }
        Command::Cleanup {
            task_id: raw,
            delete_branch,
            forget,
        } => {
            let config = load_config(layout)?;
            let task_id = TaskId::new(raw)?;
            orchestrator(layout, &config)?
                .cleanup(&task_id, delete_branch, forget)
                .await?;
            let mut out = io::stdout().lock();
            writeln!(out, "Cleaned up {task_id}")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(layout: &ProjectLayout) -> Result<AppConfig, CliError> {
    Ok(ConfigStore::new(layout.config_path()).load()?)
}

fn workspace_manager(layout: &ProjectLayout, config: &AppConfig) -> GitWorkspaceManager {
    GitWorkspaceManager::new(layout.root(), &config.worktree_base)
        .with_timeout(config.command_timeout())
}

fn orchestrator(layout: &ProjectLayout, config: &AppConfig) -> Result<Orchestrator, CliError> {
    let clock = Arc::new(DefaultClock);
    let provider = OpenAiCompatibleProvider::new(config.base_url.as_str(), config.api_key.as_str())
        .with_timeout(config.request_timeout());
    let router = ModelRouter::new(Arc::new(provider), config.routing_policy())?;
    let settings = OrchestratorSettings::new(config.max_iterations, config.base_branch()?);
    Ok(TaskOrchestrator::new(
        Arc::new(FileTaskStateStore::new(layout.tasks_dir(), Arc::clone(&clock))),
        Arc::new(workspace_manager(layout, config)),
        Arc::new(RouterTaskAgents::new(Arc::new(router))),
        Arc::new(FileSpecificationCatalogue::new(layout.specs_dir(), clock)),
        settings,
    ))
}

fn init(layout: &ProjectLayout, args: InitArgs) -> Result<ExitCode, CliError> {
    layout.ensure().map_err(|source| CliError::Layout {
        path: layout.state_dir(),
        source,
    })?;
    let config = AppConfig::initial(args.provider, args.base_url, args.api_key);
    let store = ConfigStore::new(layout.config_path());
    store.save(&config)?;

    let mut out = io::stdout().lock();
    writeln!(out, "Initialized {}", layout.state_dir())?;
    writeln!(out, "Config: {}", store.path())?;
    writeln!(out, "Provider: {}", config.provider)?;
    writeln!(out, "Base URL: {}", config.base_url)?;
    writeln!(out, "Roles configured: {}", config.models.len())?;
    Ok(ExitCode::SUCCESS)
}

async fn spec_new(layout: &ProjectLayout, raw: &str) -> Result<ExitCode, CliError> {
    let name = SpecName::new(raw)?;
    let catalogue = FileSpecificationCatalogue::new(layout.specs_dir(), Arc::new(DefaultClock));
    let path = catalogue.create_template(&name).await?;
    let mut out = io::stdout().lock();
    writeln!(out, "Created {path}")?;
    Ok(ExitCode::SUCCESS)
}

async fn spec_list(layout: &ProjectLayout) -> Result<ExitCode, CliError> {
    let catalogue = FileSpecificationCatalogue::new(layout.specs_dir(), Arc::new(DefaultClock));
    let names = catalogue.list().await?;
    let mut out = io::stdout().lock();
    if names.is_empty() {
        writeln!(out, "(no specs)")?;
    }
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn status(orchestrator: &Orchestrator, task_id: Option<String>) -> Result<ExitCode, CliError> {
    let mut out = io::stdout().lock();
    if let Some(raw) = task_id {
        let report = orchestrator.status(&TaskId::new(raw)?).await?;
        writeln!(out, "{report}")?;
        return Ok(ExitCode::SUCCESS);
    }
    let reports = orchestrator.statuses().await?;
    if reports.is_empty() {
        writeln!(out, "(no tasks)")?;
    }
    for report in reports {
        writeln!(out, "{}: {} ({})", report.task_id, report.phase, report.status)?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn worktree_list(manager: &GitWorkspaceManager) -> Result<ExitCode, CliError> {
    let entries = manager.list().await?;
    let mut out = io::stdout().lock();
    for entry in entries {
        let branch = entry.branch_name().unwrap_or("(detached)");
        writeln!(out, "{}  {branch}", entry.path())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn logs(layout: &ProjectLayout, task_id: Option<&str>, count: usize) -> Result<ExitCode, CliError> {
    let logs_dir = layout.logs_dir();
    let mut out = io::stdout().lock();
    let path = match task_id {
        Some(raw) => {
            let path = logs_dir.join(format!("{raw}.{}", telemetry::LOG_EXTENSION));
            if !path.is_file() {
                writeln!(out, "Log not found: {path}")?;
                return Ok(ExitCode::FAILURE);
            }
            path
        }
        None => {
            let latest = telemetry::latest_log(&logs_dir).map_err(|source| CliError::Log {
                path: logs_dir.clone(),
                source,
            })?;
            let Some(path) = latest else {
                writeln!(out, "(no logs)")?;
                return Ok(ExitCode::SUCCESS);
            };
            writeln!(out, "Latest: {}", path.file_name().unwrap_or(path.as_str()))?;
            path
        }
    };
    for line in read_tail(&path, count)? {
        writeln!(out, "{line}")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn read_tail(path: &Utf8Path, count: usize) -> Result<Vec<String>, CliError> {
    telemetry::tail(path, count).map_err(|source| CliError::Log {
        path: path.to_path_buf(),
        source,
    })
}

fn print_outcome(report: &TaskReport) -> Result<ExitCode, CliError> {
    let mut out = io::stdout().lock();
    writeln!(out, "{report}")?;
    if report.is_done() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
