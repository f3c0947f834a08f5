use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use steeple_core::config::Config as _;
use steeple_core::tracing::init_tracing;

use steeple_directory::config::DirectoryConfig;
use steeple_directory::infra::claims::HttpClaimsClient;
use steeple_directory::router::build_router;
use steeple_directory::state::AppState;
use steeple_directory::worker::run_outbox_worker;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = DirectoryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let claims = HttpClaimsClient::new(
        config.identity_api_url.clone(),
        config.identity_api_token.clone(),
    );

    let state = AppState { db, claims };

    // Outbox worker: drives the sync engine and counter maintenance.
    let worker_state = state.clone();
    let poll = Duration::from_secs(config.outbox_poll_secs);
    tokio::spawn(async move {
        run_outbox_worker(worker_state, poll).await;
    });

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.directory_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("directory service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
