//! Claimcheck CLI
//!
//! Main entry point for running the claimcheck quiz server.

use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use claimcheck_server::{create_router, AppState, Config, SynthesisMode};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Claimcheck - Ownership Verification Quiz Server
///
/// Synthesizes multiple-choice quizzes from the identifying features of a
/// claimed item, stores them, and verifies finders' answers over HTTP.
#[derive(Parser, Debug)]
#[command(name = "claimcheck")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: claimcheck.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Port for the HTTP API server (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing subscriber with appropriate filter
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Claimcheck server starting");
    tracing::debug!(config = ?args.config, "Config file");

    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Runs the quiz server.
///
/// 1. Load config and apply environment + CLI overrides
/// 2. Build application state (store, verifier, optional generator)
/// 3. Bind and serve until Ctrl+C
async fn run_server(args: Args) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(args.config.as_deref())?;

    // Environment overrides (GENERATION_API_KEY, USE_MOCK_AI), then CLI
    config.apply_env();
    if let Some(port) = args.port {
        config.port = port;
    }

    // Re-validate after overrides
    config.validate()?;

    print_config(&config);

    let port = config.port;
    let state = AppState::new(config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let router = create_router(state);

    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!();
    println!("Quiz server running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {e}"))?;

    println!();
    println!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Prints the loaded configuration.
fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  Port: {}", config.port);
    println!("  Quiz TTL: {}s", config.quiz_ttl_secs);
    match config.synthesis_mode() {
        SynthesisMode::Local => println!("  Synthesis: local rule-based"),
        SynthesisMode::External => {
            println!("  Synthesis: external generation");
            println!("  Generation endpoint: {}", config.generation.base_url);
            println!("  Generation model: {}", config.generation.model);
        }
    }
}
