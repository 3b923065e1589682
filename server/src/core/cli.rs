use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_AUTH_SIGNING_KEY, ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_QUERY_MAX_CONDITIONS,
    ENV_QUERY_MAX_DEPTH, ENV_QUERY_MAX_PARAM_BYTES, ENV_QUERY_REJECT_DUPLICATES,
};

#[derive(Parser)]
#[command(name = "surveyseat")]
#[command(version, about = "Survey management server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable authentication (for development)
    #[arg(long, global = true)]
    pub no_auth: bool,

    /// Enable debug mode (verbose request tracing)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Hex-encoded JWT signing key (random per process when unset)
    #[arg(long, global = true, env = ENV_AUTH_SIGNING_KEY, hide_env_values = true)]
    pub auth_signing_key: Option<String>,

    /// Maximum filter nesting depth
    #[arg(long, global = true, env = ENV_QUERY_MAX_DEPTH)]
    pub query_max_depth: Option<usize>,

    /// Maximum number of filter conditions
    #[arg(long, global = true, env = ENV_QUERY_MAX_CONDITIONS)]
    pub query_max_conditions: Option<usize>,

    /// Maximum raw size of the filter and order parameters in bytes
    #[arg(long, global = true, env = ENV_QUERY_MAX_PARAM_BYTES)]
    pub query_max_param_bytes: Option<usize>,

    /// Reject filters that repeat a field within one item
    #[arg(long, global = true, env = ENV_QUERY_REJECT_DUPLICATES)]
    pub query_reject_duplicates: Option<bool>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub auth_signing_key: Option<String>,
    pub query_max_depth: Option<usize>,
    pub query_max_conditions: Option<usize>,
    pub query_max_param_bytes: Option<usize>,
    pub query_reject_duplicates: Option<bool>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            no_auth: cli.no_auth,
            debug: cli.debug,
            config: cli.config,
            auth_signing_key: cli.auth_signing_key,
            query_max_depth: cli.query_max_depth,
            query_max_conditions: cli.query_max_conditions,
            query_max_param_bytes: cli.query_max_param_bytes,
            query_reject_duplicates: cli.query_reject_duplicates,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
