//! MioSaaS API Server
//!
//! Main entry point for the MioSaaS backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use miosaas_api::{AppState, create_router, list_version::ListVersions};
use miosaas_core::storage::{StorageConfig, StorageProvider, StorageService};
use miosaas_db::{SessionRepository, connect};
use miosaas_shared::{AppConfig, JwtConfig, JwtService};

/// Deletes expired sessions once an hour.
fn spawn_session_cleanup(repo: SessionRepository) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            ticker.tick().await;
            match repo.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Expired sessions cleaned up"),
                Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "miosaas=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
        #[allow(clippy::cast_possible_wrap)]
        refresh_token_expires_days: (config.jwt.refresh_token_expiry_secs / 86400) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create storage service when configured
    let storage = match &config.storage {
        Some(settings) => {
            let provider = StorageProvider::s3(
                settings.endpoint.clone(),
                settings.bucket.clone(),
                settings.access_key_id.clone(),
                settings.secret_access_key.clone(),
                settings.region.clone(),
            );
            let storage_config = StorageConfig::new(provider)
                .with_upload_ttl(settings.presign_upload_ttl_secs);
            let service = StorageService::from_config(storage_config)?;
            info!(
                provider = service.provider_name(),
                bucket = %settings.bucket,
                "Upload storage configured"
            );
            Some(Arc::new(service))
        }
        None => {
            info!("Upload storage not configured; /uploads disabled");
            None
        }
    };

    spawn_session_cleanup(SessionRepository::new(db.clone()));

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
        list_versions: Arc::new(ListVersions::new()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
