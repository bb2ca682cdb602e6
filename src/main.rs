use soundwave::config::Config;
use soundwave::interface::api::{build_router, init_metrics, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "postgres")]
use soundwave::infrastructure::persistence::{
    create_pool, run_migrations, DatabaseConfig, PgAlbumRepository, PgFollowRepository,
    PgPlaylistRepository, PgSongRepository, PgUserRepository,
};

#[cfg(not(feature = "postgres"))]
use soundwave::infrastructure::persistence::{
    MemoryAlbumRepository, MemoryFollowRepository, MemoryPlaylistRepository,
    MemorySongRepository, MemoryStore, MemoryUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting SoundWave streaming API");

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded: {:?}", config);

    // Initialize persistence (postgres by default, in-memory otherwise)
    #[cfg(feature = "postgres")]
    let state = {
        info!("Initializing database connection...");

        let db_config = DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            min_connections: config.database.min_connections,
            ..DatabaseConfig::default()
        };

        let pool = create_pool(&db_config).await?;
        info!("Database connection pool created");

        info!("Running database migrations...");
        run_migrations(&pool).await?;
        info!("Database migrations completed");

        AppState::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgFollowRepository::new(pool.clone())),
            Arc::new(PgSongRepository::new(pool.clone())),
            Arc::new(PgAlbumRepository::new(pool.clone())),
            Arc::new(PgPlaylistRepository::new(pool)),
        )
    };

    #[cfg(not(feature = "postgres"))]
    let state = {
        info!("Using in-memory persistence");

        let store = Arc::new(MemoryStore::new());
        AppState::new(
            Arc::new(MemoryUserRepository::new(store.clone())),
            Arc::new(MemoryFollowRepository::new(store.clone())),
            Arc::new(MemorySongRepository::new(store.clone())),
            Arc::new(MemoryAlbumRepository::new(store.clone())),
            Arc::new(MemoryPlaylistRepository::new(store)),
        )
    };

    // Initialize metrics exporter
    info!("Initializing Prometheus metrics exporter");
    let prometheus_handle = init_metrics();

    // Start REST API server
    let app = build_router(state, prometheus_handle);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("SoundWave streaming API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, stopping");
    }
}
