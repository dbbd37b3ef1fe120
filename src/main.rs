//! Self-registering service scaffold.
//!
//! Startup order: logging → config → engine → START. The engine then owns
//! the process: termination signals become STOP events, and the process
//! exits with whatever code the lifecycle requested.

use std::path::PathBuf;

use clap::Parser;

use service_bootstrap::config::loader::{config_file, load_config};
use service_bootstrap::http::server::ApiBootstrap;
use service_bootstrap::lifecycle::engine::LifecycleEngine;
use service_bootstrap::lifecycle::{shutdown, signals};
use service_bootstrap::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "service-bootstrap", about = "Self-registering service scaffold")]
struct Args {
    /// Path to the JSON config file. Defaults to config.json in the
    /// working directory, with a SERVICE_ENV-specific variant when set.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args = Args::parse();

    tracing::info!("service-bootstrap v0.1.0 starting");

    let path = args.config.unwrap_or_else(|| config_file("", "config"));
    let config = load_config(&path)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        registry = %config.registry.repo,
        self_register = config.registry.self_register,
        base_path = %config.api.base_path,
        "Configuration loaded"
    );

    let bootstrap = ApiBootstrap::new(&config);
    let mut engine = LifecycleEngine::new(config, bootstrap);
    let mut exit_rx = engine.shutdown().subscribe();

    engine.start().await;

    // Run until the lifecycle requests an exit. A termination signal maps
    // to STOP; a STOP while not running leaves the process up.
    loop {
        if engine.shutdown().requested().is_some() {
            break;
        }
        tokio::select! {
            _ = signals::terminated() => {
                engine.stop().await;
            }
            _ = exit_rx.recv() => {
                break;
            }
        }
    }

    let code = engine.shutdown().requested().unwrap_or(shutdown::CLEAN_STOP);
    tracing::info!(code, "process exiting");
    std::process::exit(code)
}
