//! claimledger server binary.
//!
//! Opens the ledger, seeds the contract type catalog, and serves workflow
//! invocations as JSON lines on stdin/stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Persistent ledger, seeded catalog
//! claimledger --data /var/lib/claimledger/ledger.db --seed contract_types.json
//!
//! # One-off invocation
//! claimledger --data ledger.db invoke contract_type_ls
//!
//! # Environment variables
//! CLAIMLEDGER__DATA=ledger.db CLAIMLEDGER__LOG_FORMAT=json claimledger
//! ```

mod config;
mod session;

use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    sync::Arc,
};

use clap::Parser;
use claimledger_chaincode::{Chaincode, ChaincodeError};
use claimledger_store::{Database, StorageBackend};
use config::{Cli, CliCommand, Config, ConfigAction, ConfigLoadError, LogFormat};
use snafu::{ResultExt, Snafu};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Top-level error type for the server binary.
#[derive(Debug, Snafu)]
enum ServerError {
    #[snafu(display("configuration error: {source}"))]
    Configuration { source: ConfigLoadError },

    #[snafu(display("failed to open ledger: {source}"))]
    Open { source: claimledger_store::Error },

    #[snafu(display("failed to read seed file {}: {source}", path.display()))]
    SeedFile { path: PathBuf, source: io::Error },

    #[snafu(display("bootstrap failed: {source}"))]
    Bootstrap { source: ChaincodeError },

    #[snafu(display("{source}"))]
    Invocation { source: ChaincodeError },

    #[snafu(display("I/O error: {source}"))]
    Io { source: io::Error },
}

fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    if let Some(CliCommand::Config { action }) = &cli.command {
        match action {
            ConfigAction::Schema => println!("{}", config::generate_schema()),
            ConfigAction::Example => print!("{}", config::generate_example()),
        }
        return Ok(());
    }

    init_logging(&cli.config);
    let workflow = cli.config.workflow().context(ConfigurationSnafu)?;

    match &cli.config.data {
        Some(path) => {
            tracing::info!(data = %path.display(), "Opening ledger");
            run(Database::open(path).context(OpenSnafu)?, &cli, workflow)
        },
        None => {
            tracing::warn!(
                "Running with an in-memory ledger. All state is lost on exit. \
                 Set --data or CLAIMLEDGER__DATA for persistent storage."
            );
            run(Database::open_in_memory().context(OpenSnafu)?, &cli, workflow)
        },
    }
}

fn run<B: StorageBackend + 'static>(
    db: Database<B>,
    cli: &Cli,
    workflow: claimledger_types::config::WorkflowConfig,
) -> Result<(), ServerError> {
    let chaincode = Chaincode::new(Arc::new(db), workflow);

    if let Some(path) = &cli.config.seed {
        let seed = std::fs::read_to_string(path).context(SeedFileSnafu { path })?;
        chaincode.init(&[seed]).context(BootstrapSnafu)?;
    }

    if let Some(CliCommand::Invoke { function, args }) = &cli.command {
        let payload = chaincode.invoke(function, args).context(InvocationSnafu)?;
        let mut stdout = io::stdout().lock();
        if !payload.is_empty() {
            stdout.write_all(&payload).context(IoSnafu)?;
            stdout.write_all(b"\n").context(IoSnafu)?;
        }
        return Ok(());
    }

    tracing::info!(operations = chaincode.operations().len(), "Serving invocations on stdin");
    let stats = session::serve(&chaincode, io::stdin().lock(), io::stdout().lock())
        .context(IoSnafu)?;
    let db_stats = chaincode.database().stats();
    tracing::info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        keys = db_stats.key_count,
        "Input closed, shutting down"
    );
    Ok(())
}

/// Initializes logging on stderr.
///
/// Supports three formats:
/// - `Text`: Human-readable format (development)
/// - `Json`: JSON structured logging (production)
/// - `Auto`: JSON when stderr is not a terminal, text otherwise
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match config.log_format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !io::stderr().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stderr))
            .init();
    }
}
