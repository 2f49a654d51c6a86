//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use kyarafit_core::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (token redacted)
    Show,
    /// Validate the configuration file and environment
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            if config.session.token.is_some() {
                config.session.token = Some("****".to_string());
            }
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => {
                    output::print_kv("api.base_url", &config.api.base_url);
                    output::print_kv("api.timeout", &format!("{}s", config.api.timeout_seconds));
                    output::print_kv("api.user_agent", &config.api.user_agent);
                    output::print_kv(
                        "session.token",
                        config.session.token.as_deref().unwrap_or("(none)"),
                    );
                    output::print_kv("store.page_size", &config.store.page_size.to_string());
                    output::print_kv(
                        "store.debounce",
                        &format!("{}ms", config.store.debounce_millis),
                    );
                    output::print_kv(
                        "store.fetch_to",
                        &format!("{}s", config.store.fetch_timeout_seconds),
                    );
                    output::print_kv("store.fallback", &format!("{:?}", config.store.fallback));
                    output::print_kv("logging.level", &config.logging.level);
                    output::print_kv("logging.format", &config.logging.format);
                }
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                println!("  Backend: {}", config.api.base_url);
                println!(
                    "  Session: {}",
                    if config.session.token.is_some() { "token set" } else { "no token" }
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
