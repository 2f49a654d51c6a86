//! KyaraFit closet browser.
//!
//! Interactive terminal view over the pieces backend: type to search,
//! slash commands for everything else.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use kyarafit_client::{HttpPieceClient, PieceApi};
use kyarafit_core::config::AppConfig;
use kyarafit_core::error::AppError;
use kyarafit_core::traits::{SessionProvider, WatchSession};
use kyarafit_core::types::SessionState;
use kyarafit_store::{
    CollectionState, CreateForm, FetchStatus, FetchTrigger, FilterController, ItemsSource,
    PieceStore,
};

const HELP: &str = "\
Type text to search. Commands:
  /category NAME|all   filter by category
  /clear               clear the search
  /refresh             reload the current list
  /add NAME [#tag ..]  create a piece
  /login TOKEN         switch session
  /logout              sign out
  /quit                exit";

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Browser error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("KYARAFIT_CONFIG").unwrap_or_else(|_| "config/kyarafit.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting KyaraFit browser v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpPieceClient::new(&config.api)?;
    match client.health().await {
        Ok(health) if health.is_ok() => tracing::info!(url = %client.base_url(), "Backend healthy"),
        Ok(health) => tracing::warn!(status = %health.status, "Backend reports unhealthy"),
        Err(e) => tracing::warn!(error = %e, "Backend health check failed"),
    }
    let api: Arc<dyn PieceApi> = Arc::new(client);

    let session = Arc::new(WatchSession::default());
    let store = Arc::new(PieceStore::new(
        api.clone(),
        session.clone(),
        config.store.clone(),
    ));
    let session_watcher = store.watch_session();
    let renderer = tokio::spawn(render(store.subscribe()));

    // Leave pending until the token is resolved.
    session.set(SessionState::from_token(config.session.token.as_deref()));
    if !session.current().is_authenticated() {
        println!("No session token configured. Use /login TOKEN.");
    }

    let filter = FilterController::spawn(store.clone());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/help", _) => println!("{HELP}"),
            ("/clear", _) => filter.clear_search(),
            ("/refresh", _) => drop(store.spawn_fetch(FetchTrigger::Refresh, None)),
            ("/category", name) => {
                let name = name.trim();
                filter.select_category((!name.is_empty()).then_some(name));
            }
            ("/login", token) => session.set(SessionState::from_token(Some(token))),
            ("/logout", _) => session.set(SessionState::Absent),
            ("/add", rest) => {
                let mut form =
                    CreateForm::new(api.clone(), session.clone()).with_store(store.clone());
                let mut name = Vec::new();
                for word in rest.split_whitespace() {
                    match word.strip_prefix('#') {
                        Some(tag) => {
                            form.add_tag(tag);
                        }
                        None => name.push(word),
                    }
                }
                form.set_name(name.join(" "));
                if let Err(e) = form.submit().await {
                    println!("Could not add piece: {}", e.message);
                }
            }
            (cmd, _) if cmd.starts_with('/') => println!("Unknown command {cmd}. Try /help."),
            _ => filter.set_search(line),
        }
    }

    tracing::info!("Shutting down");
    filter.shutdown();
    renderer.abort();
    if let Some(watcher) = session_watcher {
        watcher.abort();
    }
    Ok(())
}

/// Print the collection every time it changes.
async fn render(mut rx: watch::Receiver<CollectionState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        print_state(&state);
    }
}

fn print_state(state: &CollectionState) {
    let filters = match (&state.criteria.search, &state.criteria.category) {
        (None, None) => "all pieces".to_string(),
        (Some(s), None) => format!("\"{s}\""),
        (None, Some(c)) => format!("category {c}"),
        (Some(s), Some(c)) => format!("\"{s}\" in {c}"),
    };

    match &state.status {
        FetchStatus::Loading => println!("Loading {filters}..."),
        FetchStatus::Refreshing => println!("Refreshing {filters}..."),
        FetchStatus::Failed(e) if e.requires_reauthentication() => {
            println!("Session expired. Use /login TOKEN.")
        }
        FetchStatus::Failed(e) => println!("Could not load pieces: {}", e.message),
        FetchStatus::Idle => {}
    }
    if state.loading() {
        return;
    }

    if state.source == ItemsSource::Placeholder {
        println!("(showing sample pieces)");
    }
    println!("── {} of {} ({filters}) ──", state.items.len(), state.total);
    for piece in &state.items {
        let category = piece.category.as_deref().unwrap_or("-");
        let price = piece
            .price
            .map_or_else(String::new, |p| format!("  ${p:.2}"));
        println!("  {:<32} {:<10}{}", piece.name, category, price);
    }
}
