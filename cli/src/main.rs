//! CLI entrypoint for model-ensemble
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ensemble_application::{
    AuditSink, EnsembleConfig, EnsembleVerifier, ModelSelector, NoAuditSink, NoProgress,
    VerificationProgress,
};
use ensemble_domain::{ConfigIssue, SelectionContext, VerificationContext};
use ensemble_infrastructure::{
    ConfigLoader, FileConfig, FixtureExecutor, InMemoryMetrics, InMemoryRegistry,
    JsonlAuditSink, TracingAuditSink,
};
use ensemble_presentation::{
    Cli, Command, ConsoleFormatter, IdentityArgs, JsonFormatter, OutputFormat, OutputFormatter,
    ProgressReporter, SelectArgs, SourceStatus, VerifyArgs,
};
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_NAME: &str = "model-ensemble.log";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting model-ensemble");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    let issues = config.validate();

    let formatter: Box<dyn OutputFormatter> = match cli.output {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };

    if let Command::Config = cli.command {
        let sources: Vec<SourceStatus> = ConfigLoader::sources(cli.config.as_deref())
            .into_iter()
            .map(|source| SourceStatus {
                label: source.kind.label(),
                location: source.location,
                found: source.found,
            })
            .collect();
        println!("{}", formatter.format_config_report(&sources, &issues));
        return Ok(if issues.iter().any(ConfigIssue::is_error) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    report_issues(&issues)?;
    let ensemble = config.to_ensemble_config();

    // === Dependency Injection ===
    let registry = Arc::new(InMemoryRegistry::new(config.registry_models()));
    let metrics = Arc::new(load_metrics(cli.metrics.as_deref())?);
    let selector = ModelSelector::new(registry, metrics, ensemble.canary().clone());

    match cli.command {
        Command::Select(args) => {
            let context = selection_context(&args);
            let outcome = selector.select(&context).await?;
            println!("{}", formatter.format_selection(&outcome));
            Ok(if outcome.is_not_found() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Verify(args) => {
            let verifier = build_verifier(selector, &config, &ensemble, &args)?;
            let context = verification_context(&args)?;

            let outcome = if cli.quiet {
                verifier.verify_with_progress(&context, &NoProgress).await?
            } else {
                let progress: &dyn VerificationProgress = &ProgressReporter::new();
                verifier.verify_with_progress(&context, progress).await?
            };

            println!("{}", formatter.format_verification(&outcome));
            Ok(if outcome.is_accepted() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Command::Config => Ok(ExitCode::SUCCESS),
    }
}

/// Install the stderr subscriber, plus a daily-rotated file layer when a
/// log directory is given.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Print configuration issues; fail if any is an error.
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        if issue.is_error() {
            eprintln!("config error: {}", issue.message);
        } else {
            warn!("config: {}", issue.message);
        }
    }
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Invalid configuration. Run `model-ensemble config` for details.");
    }
    Ok(())
}

fn load_metrics(path: Option<&Path>) -> Result<InMemoryMetrics> {
    let Some(path) = path else {
        return Ok(InMemoryMetrics::new());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metrics file {}", path.display()))?;
    let metrics = InMemoryMetrics::from_json_str(&json)
        .with_context(|| format!("Invalid metrics file {}", path.display()))?;
    info!("Loaded metrics for {} model(s)", metrics.model_count());
    Ok(metrics)
}

fn audit_sink(config: &FileConfig) -> Arc<dyn AuditSink> {
    if !config.audit.enabled {
        return Arc::new(NoAuditSink);
    }
    match config.audit.resolved_log_path() {
        Some(path) => match JsonlAuditSink::new(&path) {
            Some(sink) => Arc::new(sink),
            None => {
                warn!("Audit file unavailable, logging audit events instead");
                Arc::new(TracingAuditSink)
            }
        },
        None => Arc::new(TracingAuditSink),
    }
}

fn build_verifier(
    selector: ModelSelector<InMemoryRegistry, InMemoryMetrics>,
    config: &FileConfig,
    ensemble: &EnsembleConfig,
    args: &VerifyArgs,
) -> Result<EnsembleVerifier<InMemoryRegistry, InMemoryMetrics, FixtureExecutor>> {
    let responses = std::fs::read_to_string(&args.responses)
        .with_context(|| format!("Failed to read responses file {}", args.responses.display()))?;
    let executor = FixtureExecutor::from_json_str(&responses)
        .with_context(|| format!("Invalid responses file {}", args.responses.display()))?;
    debug!(
        "Replaying responses for: {}",
        executor.model_ids().collect::<Vec<_>>().join(", ")
    );

    Ok(
        EnsembleVerifier::new(selector, Arc::new(executor), ensemble.verification().clone())
            .with_audit_sink(audit_sink(config)),
    )
}

fn selection_context(args: &SelectArgs) -> SelectionContext {
    let IdentityArgs {
        user,
        project,
        capabilities,
    } = &args.identity;

    let mut context = SelectionContext::new(args.role)
        .with_critical(args.critical)
        .with_capabilities(capabilities.iter().cloned());
    if let Some(user) = user {
        context = context.with_user(user.clone());
    }
    if let Some(project) = project {
        context = context.with_project(project.clone());
    }
    context
}

fn verification_context(args: &VerifyArgs) -> Result<VerificationContext> {
    let inputs = match &args.inputs {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read inputs file {}", path.display()))?;
            serde_json::from_str::<Value>(&json)
                .with_context(|| format!("Invalid inputs file {}", path.display()))?
        }
        None => Value::Object(Default::default()),
    };

    let mut context = VerificationContext::new(args.operation, inputs);
    if args.no_quorum {
        context = context.without_quorum();
    }
    if let Some(quorum_size) = args.quorum_size {
        context = context.with_quorum_size(quorum_size);
    }
    if let Some(user) = &args.identity.user {
        context = context.with_user(user.clone());
    }
    if let Some(project) = &args.identity.project {
        context = context.with_project(project.clone());
    }
    for capability in &args.identity.capabilities {
        context = context.with_capability(capability.clone());
    }
    Ok(context)
}
