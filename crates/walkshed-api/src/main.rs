use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderName, HeaderValue, Method};
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkshed_core::config::LayeredConfig;
use walkshed_core::ports::{IsochroneProvider, PoiProvider};
use walkshed_lookup::{
    CacheSettings, LookupOrchestrator, LookupService, LookupSettings, QuotaGuard, QuotaSettings,
    TieredCache,
};
use walkshed_providers::{GeoapifyIsoline, GeoapifyPlaces};
use walkshed_store::ports::DurableStore;
use walkshed_store::postgres::{PostgresConfig, PostgresStore};
use walkshed_store::{MemoryDurableStore, MemoryFastStore};

use walkshed_api::handlers::CLIENT_ID_HEADER;
use walkshed_api::maintenance::spawn_purge_task;
use walkshed_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "walkshed_api=info,walkshed_lookup=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &api_config.config_file {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }
    let config = config.load_from_env();
    config.validate().context("Invalid configuration")?;
    let api_key = config.require_api_key()?;

    tracing::info!(
        port = api_config.port,
        walk_minutes = config.walk_minutes.value,
        radius_m = config.poi_radius_meters.value,
        quota = config.quota_limit.value,
        "Starting walkshed API server"
    );

    let mut settings: Vec<_> = config.to_inspection_map().into_iter().collect();
    settings.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, (value, source)) in settings {
        tracing::debug!(key = %key, value = %value, source = ?source, "Effective setting");
    }

    // Durable tier: PostgreSQL when DATABASE_URL is set, memory otherwise
    let postgres = match &api_config.database_url {
        Some(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            let store = init_postgres_storage(database_url).await.context(
                "Failed to connect to PostgreSQL; ensure it is running and DATABASE_URL is correct",
            )?;
            tracing::info!("Connected to PostgreSQL");
            Some(store)
        }
        None => {
            tracing::info!("Using in-memory durable tier (set DATABASE_URL for PostgreSQL)");
            None
        }
    };
    let durable_store: Arc<dyn DurableStore> = match &postgres {
        Some(store) => store.clone() as Arc<dyn DurableStore>,
        None => Arc::new(MemoryDurableStore::new()),
    };
    let fast_store = MemoryFastStore::new();

    let client = reqwest::Client::new();
    let places: Arc<dyn PoiProvider> = Arc::new(
        GeoapifyPlaces::new(config.places_url.value.clone(), api_key.clone())
            .with_client(client.clone()),
    );
    let isoline: Arc<dyn IsochroneProvider> = Arc::new(
        GeoapifyIsoline::new(config.isoline_url.value.clone(), api_key).with_client(client),
    );

    let lookup = LookupService::new(
        TieredCache::new(
            Arc::new(fast_store.clone()),
            durable_store.clone(),
            CacheSettings::from_config(&config),
        ),
        QuotaGuard::new(Arc::new(fast_store.clone()), QuotaSettings::from_config(&config)),
        LookupOrchestrator::new(places, isoline, LookupSettings::from_config(&config)),
    );

    let state = Arc::new(AppState::new(lookup, fast_store, durable_store));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let purge = spawn_purge_task(
        state.fast_store.clone(),
        state.durable_store.clone(),
        api_config.purge_interval,
        shutdown_rx,
    );

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", api_config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(CLIENT_ID_HEADER)]);

    let app = create_router(state).layer(cors);

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = purge.await {
        tracing::warn!(error = %e, "Cache purge task ended abnormally");
    }

    if let Some(store) = postgres {
        store.close().await;
        tracing::info!("PostgreSQL pool closed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

/// Initialize PostgreSQL storage from a database URL
async fn init_postgres_storage(database_url: &str) -> anyhow::Result<Arc<PostgresStore>> {
    let config = PostgresConfig::new(database_url.to_string()).context("Invalid DATABASE_URL")?;

    let store = PostgresStore::with_migrations(config).await?;
    Ok(Arc::new(store))
}
