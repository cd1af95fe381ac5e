use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use combo_server::config::{self, AppState, Config};
use combo_server::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument overrides the config file path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_FILE.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Multi-threaded runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(AppState::new(cfg));
    logger::log_server_start(&addr, &state.config);
    if !state.is_ready() {
        logger::log_warning(&format!(
            "Combo base path '{}' is not a directory; every script will be reported missing",
            state.base_path.display()
        ));
    }

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    server::start_server_loop(
        listener,
        state,
        Arc::new(AtomicUsize::new(0)),
        Arc::clone(&signals.shutdown),
    )
    .await?;

    logger::log_info("Server stopped");
    Ok(())
}
