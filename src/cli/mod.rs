//! CLI module for Pingpad
//!
//! Command-line front end over the library: every command builds an
//! [`ApiClient`] from layered configuration, runs one view operation, and
//! renders the result as a table or JSON.
//!
//! # Commands
//!
//! - `endpoints` - Manage and test endpoints (list, show, create, update, delete, test)
//! - `analytics` - Aggregated response-time analytics for one endpoint
//! - `alarms` - Active alarms (list, count, ack, watch)
//! - `keys` - API-key vault (list, add, update, delete)
//! - `login`, `register`, `login-as-test`, `whoami`, `profile` - Session and profile
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Log in and keep the token for later commands
//! export PINGPAD_TOKEN=$(pingpad login-as-test --token-only)
//!
//! # Hourly analytics for the last day
//! pingpad analytics 3f2a... --range 24h
//!
//! # Follow the alarm feed
//! pingpad alarms watch
//! ```

pub mod alarms;
pub mod analytics;
pub mod auth;
pub mod completions;
pub mod config;
pub mod endpoints;
pub mod keys;
pub mod output;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::analytics::TimeRange;
use crate::client::ApiClient;
use crate::config::PingpadConfig;
use crate::model::{HttpMethod, RecurringInterval};
use crate::session::Session;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pingpad.toml";

/// Pingpad - API endpoint monitoring dashboard
#[derive(Parser, Debug)]
#[command(
    name = "pingpad",
    version,
    about = "Create, test and monitor HTTP API endpoints"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "PINGPAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override backend base URL
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Bearer token to authenticate with
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage and test endpoints
    #[command(subcommand)]
    Endpoints(EndpointsCommands),
    /// Show analytics for an endpoint
    Analytics(AnalyticsArgs),
    /// Inspect and acknowledge alarms
    #[command(subcommand)]
    Alarms(AlarmsCommands),
    /// Manage stored API keys
    #[command(subcommand)]
    Keys(KeysCommands),
    /// Log in with email and password
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// Log in with the shared demo account
    LoginAsTest(TokenOutputArgs),
    /// Show the authenticated user
    Whoami(JsonArgs),
    /// Update the authenticated user's profile
    #[command(subcommand)]
    Profile(ProfileCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum EndpointsCommands {
    /// List endpoints
    List(JsonArgs),
    /// Show one endpoint
    Show(EndpointIdArgs),
    /// Create an endpoint
    Create(EndpointCreateArgs),
    /// Update an endpoint (omitted fields keep their value)
    Update(EndpointUpdateArgs),
    /// Delete an endpoint
    Delete(EndpointIdArgs),
    /// Run a test against an endpoint now
    Test(EndpointIdArgs),
}

#[derive(Args, Debug)]
pub struct EndpointIdArgs {
    /// Endpoint ID
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EndpointCreateArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Target URL (http or https)
    #[arg(short, long)]
    pub url: String,

    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: HttpMethod,

    /// Request header as "Key: Value" (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(short, long)]
    pub body: Option<String>,

    /// Re-run the test on this interval (30s, 5m, 1h, 24h)
    #[arg(short, long)]
    pub every: Option<RecurringInterval>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EndpointUpdateArgs {
    /// Endpoint ID
    pub id: String,

    /// New display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New target URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// New HTTP method
    #[arg(short = 'X', long)]
    pub method: Option<HttpMethod>,

    /// Replace headers with these "Key: Value" lines (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Remove all headers
    #[arg(long, conflicts_with = "headers")]
    pub clear_headers: bool,

    /// New request body
    #[arg(short, long)]
    pub body: Option<String>,

    /// Recurring interval (30s, 5m, 1h, 24h)
    #[arg(short, long)]
    pub every: Option<RecurringInterval>,

    /// Stop recurring tests
    #[arg(long, conflicts_with = "every")]
    pub no_recurring: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// Endpoint ID
    pub endpoint_id: String,

    /// Time range (24h, 7d, 30d)
    #[arg(short, long, default_value = "24h")]
    pub range: TimeRange,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum AlarmsCommands {
    /// List active alarms
    List(JsonArgs),
    /// Print the number of active alarms
    Count,
    /// Acknowledge alarms by test result ID
    Ack(AlarmsAckArgs),
    /// Poll the alarm feed until interrupted
    Watch(AlarmsWatchArgs),
}

#[derive(Args, Debug)]
pub struct AlarmsAckArgs {
    /// Test result IDs of the alarms to acknowledge
    #[arg(required_unless_present = "all")]
    pub ids: Vec<String>,

    /// Acknowledge every active alarm
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct AlarmsWatchArgs {
    /// Seconds between refreshes
    #[arg(short, long, env = "PINGPAD_ALARM_INTERVAL")]
    pub interval: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// List stored API keys (values masked)
    List(KeysListArgs),
    /// Store a new API key
    Add(KeysAddArgs),
    /// Rename a key or replace its value
    Update(KeysUpdateArgs),
    /// Delete a key
    Delete(KeysDeleteArgs),
}

#[derive(Args, Debug)]
pub struct KeysListArgs {
    /// Show full key values
    #[arg(long)]
    pub reveal: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct KeysAddArgs {
    /// Key name
    pub name: String,

    /// Key value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct KeysUpdateArgs {
    /// Key ID
    pub id: String,

    /// New name
    #[arg(short, long)]
    pub name: String,

    /// New value (kept when omitted)
    #[arg(short, long)]
    pub value: Option<String>,
}

#[derive(Args, Debug)]
pub struct KeysDeleteArgs {
    /// Key ID
    pub id: String,
}

#[derive(Args, Debug, Default)]
pub struct TokenOutputArgs {
    /// Print only the token
    #[arg(long)]
    pub token_only: bool,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "PINGPAD_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(flatten)]
    pub output: TokenOutputArgs,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Account password (at least 6 characters)
    #[arg(short, long, env = "PINGPAD_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(flatten)]
    pub output: TokenOutputArgs,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Change display name
    Rename(ProfileRenameArgs),
    /// Change password
    Password(ProfilePasswordArgs),
}

#[derive(Args, Debug)]
pub struct ProfileRenameArgs {
    /// New display name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ProfilePasswordArgs {
    /// Current password
    #[arg(long)]
    pub current: String,

    /// New password (at least 6 characters)
    #[arg(long)]
    pub new: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
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

/// Resolve configuration: file, then `PINGPAD_*` variables, then flags.
///
/// Without `--config`, `pingpad.toml` in the working directory is used when
/// present.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<PingpadConfig> {
    let path = match &global.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut config = PingpadConfig::load(path.as_deref().map(Path::new))
        .context("Failed to load configuration")?
        .with_env_overrides();

    if let Some(url) = &global.backend_url {
        config.backend.base_url = url.clone();
    }
    if let Some(token) = &global.token {
        config.backend.token = Some(token.clone());
    }
    if let Some(level) = &global.log_level {
        config.logging.level = level.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Client with a fresh session, pre-authenticated when a token is configured.
pub fn build_client(config: &PingpadConfig) -> anyhow::Result<ApiClient> {
    let session = match &config.backend.token {
        Some(token) => Session::with_token(token.clone()),
        None => Session::new(),
    };
    ApiClient::new(&config.backend, Arc::new(session)).context("Failed to create HTTP client")
}
