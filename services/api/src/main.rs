use sea_orm::Database;
use tracing::info;

use warden_api::config::AppConfig;
use warden_api::router::build_router;
use warden_api::seeder::{SeedContext, run_all};
use warden_api::state::AppState;
use warden_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let port = config.api_port;
    let run_seeders = config.run_seeders;
    let state = AppState::new(db, config);

    if run_seeders {
        run_all(&SeedContext::from_state(&state), None)
            .await
            .expect("seeding failed");
    }

    let router = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
