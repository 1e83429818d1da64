mod core;
mod infra;

use std::sync::Arc;

use crate::core::state::ImageListState;
use crate::core::sync::SyncJob;
use infra::config::Config;
use infra::database::Database;
use infra::placeholder::PlaceholderClient;
use infra::terminal::TerminalInput;
use tracing::error;

fn main() {
    // Load .env (silently ignore if missing — production uses real env vars)
    let _ = dotenvy::dotenv();

    let cli_mode = std::env::args().any(|a| a == "--cli");
    // Keep the terminal menu readable unless MYPICS_LOG asks for more.
    infra::logging::init(if cli_mode { "warn" } else { "info" });

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => fail("Invalid configuration", e),
    };

    // Build the photo client BEFORE entering the async runtime.
    // reqwest::blocking::Client creates its own mini-runtime;
    // constructing/dropping it inside block_on causes a panic.
    let source = Arc::new(PlaceholderClient::new(&config.photos_api_url));

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail("Failed to create async runtime", e),
    };

    let store = match rt.block_on(Database::open(&config.database)) {
        Ok(db) => Arc::new(db),
        Err(e) => fail("Failed to open photo store", e),
    };

    let state = Arc::new(ImageListState::new(
        Arc::clone(&store),
        Arc::clone(&source),
        config.preview_limit,
    ));
    let job = Arc::new(SyncJob::new(store, Arc::clone(&source)));

    {
        let state = Arc::clone(&state);
        rt.spawn(async move { state.initial_load().await });
    }
    {
        let job = Arc::clone(&job);
        rt.spawn(async move { job.run().await });
    }

    if cli_mode {
        crate::core::app::App::new(rt.handle().clone(), state, job.subscribe(), TerminalInput).run();
    } else {
        let server = infra::web::start_server(Arc::clone(&state), job.subscribe(), config.port);
        if let Err(e) = rt.block_on(server) {
            fail("Web server stopped", e);
        }
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    error!("{context}: {err}");
    std::process::exit(1);
}
