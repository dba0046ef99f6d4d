//! commitai - CLI entry point.

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commitai::llm::{OpenAiBackend, RetryPolicy};
use commitai::{App, BackendConfig, SessionOptions, SessionOutcome, SystemGit};

/// Log file path; logging is off unless this is set or `--verbose` is given.
const LOG_ENV_VAR: &str = "COMMITAI_LOG";
const DEFAULT_LOG_FILE: &str = "commitai.log";

/// Generate commit messages for the staged changes and commit one.
#[derive(Parser, Debug)]
#[command(name = "commitai")]
#[command(about = "Generate commit messages for your staged changes with AI")]
#[command(version)]
struct Cli {
    /// Edit the selected message before committing
    #[arg(
        short = 'e',
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    edit: bool,

    /// Ask for confirmation before committing
    #[arg(
        short = 'c',
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    confirmation: bool,

    /// Number of commit messages to generate (1 to 5)
    #[arg(
        short = 'n',
        long = "numberOfCommitMessages",
        visible_alias = "number-of-commit-messages",
        default_value_t = 3
    )]
    number_of_commit_messages: u32,

    /// Write debug logs (to $COMMITAI_LOG, or commitai.log in the temp dir)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    // Step 1: Validate options before touching credentials
    let options = SessionOptions::new(cli.edit, cli.confirmation, cli.number_of_commit_messages)?;

    // Step 2: Backend configuration
    let config = BackendConfig::from_env()?;
    info!("Using backend {:?}", config);
    let backend = OpenAiBackend::new(&config).context("Failed to set up the completion backend")?;

    // Step 3: Run the interactive session
    let workdir = std::env::current_dir().context("Failed to read the current directory")?;
    let mut app = App::new(
        options,
        Arc::new(SystemGit::new(workdir)),
        Arc::new(backend),
        RetryPolicy::default(),
    );

    commitai::tui::run(&mut app).await.context("Failed to commit")?;

    match app.outcome() {
        Some(SessionOutcome::Committed(output)) => {
            println!("{output}");
            Ok(())
        }
        Some(SessionOutcome::Failed(message)) => bail!(message),
        Some(SessionOutcome::Declined) | None => Ok(()),
    }
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing(verbose: bool) -> Result<()> {
    let path = match std::env::var_os(LOG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ if verbose => std::env::temp_dir().join(DEFAULT_LOG_FILE),
        _ => return Ok(()),
    };

    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let default_level = if verbose { "commitai=debug" } else { "commitai=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}
