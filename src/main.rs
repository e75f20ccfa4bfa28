use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use codeleap::backend::{HttpBackend, PostsBackend};
use codeleap::config::{Cli, Config};
use codeleap::db;
use codeleap::routes;
use codeleap::state::AppState;
use codeleap::store::{SharedStore, Store};
use codeleap::sync::Feed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Preferences database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;

    let mut store = Store::new();
    let username = db::settings::load_username(&pool)?;
    if let Some(ref name) = username {
        tracing::info!("Signed in as @{}", name);
    }
    store.set_username(username);

    let backend: Option<Arc<dyn PostsBackend>> = if config.backend.enabled {
        let http = HttpBackend::new(&config.backend.base_url, config.backend.timeout())?;
        tracing::info!("Posts backend: {}", http.base_url());
        Some(Arc::new(http))
    } else {
        tracing::info!("Backend disabled, posts stay local");
        None
    };

    let feed = Feed::new(SharedStore::new(store), backend);

    if feed.is_online() && config.backend.refresh_on_start {
        // A failed first load leaves an empty feed; the UI can retry via /api/refresh.
        if let Err(e) = feed.refresh().await {
            tracing::warn!("Initial refresh failed: {}", e);
        }
    }

    let state = AppState {
        db: pool,
        config: config.clone(),
        feed,
    };

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
