use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use annolab_api::config::ServerConfig;
use annolab_api::router::build_app_router;
use annolab_api::state::AppState;
use annolab_concord::{ConcordanceEngine, PgStore};
use annolab_events::{EventBus, EventPersistence};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "annolab_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = annolab_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    annolab_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    annolab_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus + audit persistence ---
    let event_bus = Arc::new(EventBus::default());
    tokio::spawn(EventPersistence::run(pool.clone(), event_bus.subscribe()));

    // --- Concordance engine ---
    let concord = Arc::new(ConcordanceEngine::new(PgStore::new(pool.clone())));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        concord,
    };

    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST/PORT must form a valid socket address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(%addr, "annolab API listening");

    axum::serve(listener, app).await.expect("Server error");
}
