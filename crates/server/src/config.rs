//! Server configuration.
//!
//! Every flag can also be set through a `CLAIMLEDGER__`-prefixed environment
//! variable; command-line arguments take precedence. Workflow switches may
//! additionally come from the `[workflow]` table of a TOML file.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use claimledger_types::config::{ConfigError, WorkflowConfig};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "claimledger", version, about = "Multi-party insurance workflow ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    #[command(flatten)]
    pub config: Config,
}

/// Subcommands. Without one, the server reads requests from stdin.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a single operation and print its payload.
    Invoke {
        /// Operation name, e.g. `contract_type_ls`.
        function: String,
        /// JSON arguments.
        args: Vec<String>,
    },
    /// Inspect the workflow configuration format.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the JSON schema of the `[workflow]` table.
    Schema,
    /// Print an example configuration file.
    Example,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// JSON when stderr is not a terminal, text otherwise.
    #[default]
    Auto,
    /// Human-readable text.
    Text,
    /// One JSON object per event.
    Json,
}

/// Process configuration.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Ledger state file. State is kept in memory when unset.
    #[arg(long = "data", env = "CLAIMLEDGER__DATA")]
    pub data: Option<PathBuf>,

    /// JSON array of contract types to seed the catalog with at startup.
    #[arg(long, env = "CLAIMLEDGER__SEED")]
    pub seed: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", env = "CLAIMLEDGER__CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long, env = "CLAIMLEDGER__LOG_FORMAT", value_enum, default_value_t = LogFormat::Auto)]
    pub log_format: LogFormat,

    /// Reject `contract_type_create` for an existing uuid.
    #[arg(long, env = "CLAIMLEDGER__STRICT_CONTRACT_TYPES")]
    pub strict_contract_types: bool,
}

/// Errors loading the configuration file.
#[derive(Debug, Snafu)]
pub enum ConfigLoadError {
    #[snafu(display("Failed to read config file {}: {source}", path.display()))]
    Read { path: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to parse config file {}: {source}", path.display()))]
    Parse { path: PathBuf, source: toml::de::Error },

    #[snafu(display("{source}"))]
    Invalid { source: ConfigError },
}

/// Layout of the TOML configuration file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    workflow: WorkflowConfig,
}

impl Config {
    /// Resolves the workflow configuration: the file's `[workflow]` table (or
    /// defaults), with command-line switches applied on top.
    pub fn workflow(&self) -> Result<WorkflowConfig, ConfigLoadError> {
        let mut workflow = match &self.config_file {
            Some(path) => load_file(path)?.workflow,
            None => WorkflowConfig::default(),
        };
        if self.strict_contract_types {
            workflow.strict_contract_types = true;
        }
        workflow.validate().context(InvalidSnafu)?;
        Ok(workflow)
    }
}

fn load_file(path: &Path) -> Result<ConfigFile, ConfigLoadError> {
    let contents = std::fs::read_to_string(path).context(ReadSnafu { path })?;
    toml::from_str(&contents).context(ParseSnafu { path })
}

/// JSON schema of the `[workflow]` table.
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(WorkflowConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// An example configuration file with every default spelled out.
pub fn generate_example() -> String {
    let body = toml::to_string(&ConfigFile::default()).unwrap_or_default();
    format!("# claimledger configuration\n# Pass with --config or CLAIMLEDGER__CONFIG.\n\n{body}")
}
