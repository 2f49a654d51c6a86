//! CLI command definitions and dispatch.

pub mod categories;
pub mod config;
pub mod health;
pub mod pieces;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use kyarafit_client::HttpPieceClient;
use kyarafit_core::AppError;
use kyarafit_core::config::AppConfig;
use kyarafit_core::traits::{SessionProvider, StaticSession};
use kyarafit_core::types::{AccessToken, SessionState};

/// KyaraFit: catalog your cosplay wardrobe
#[derive(Debug, Parser)]
#[command(name = "kyarafit", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "KYARAFIT_CONFIG", default_value = "config/kyarafit.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Bearer token, overrides `session.token` from the config
    #[arg(long, env = "KYARAFIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Wardrobe piece management
    Pieces(pieces::PiecesArgs),
    /// List the categories in use
    Categories,
    /// Check backend health
    Health,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Pieces(args) => pieces::execute(args, &self.context()?, self.format).await,
            Commands::Categories => categories::execute(&self.context()?, self.format).await,
            Commands::Health => health::execute(&self.context()?, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format),
        }
    }

    fn context(&self) -> Result<Context, AppError> {
        let config = load_config(&self.config)?;
        let token = self
            .token
            .as_deref()
            .or(config.session.token.as_deref());
        let session = Arc::new(StaticSession::from_token(token));
        let client = Arc::new(HttpPieceClient::new(&config.api)?);
        tracing::debug!(
            base_url = %client.base_url(),
            authenticated = session.current().is_authenticated(),
            "CLI context ready"
        );
        Ok(Context {
            config,
            session,
            client,
        })
    }
}

/// Everything a command needs to talk to the backend.
#[derive(Debug)]
pub struct Context {
    pub config: AppConfig,
    pub session: Arc<StaticSession>,
    pub client: Arc<HttpPieceClient>,
}

impl Context {
    /// The session token, or `Unauthorized` if none was configured.
    pub fn token(&self) -> Result<AccessToken, AppError> {
        match self.session.current() {
            SessionState::Present(token) => Ok(token),
            _ => Err(AppError::unauthorized("No access token configured")),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}
