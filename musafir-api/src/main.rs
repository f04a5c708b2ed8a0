use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use musafir_api::{app, state::AuthConfig, AppState};
use musafir_booking::{BookingManager, BookingStore, NotificationDispatcher};
use musafir_catalog::CatalogStore;
use musafir_store::{DbClient, KafkaNotifier, PgBookingStore, PgCatalogStore, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "musafir_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = musafir_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Musafir API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let redis = RedisClient::new(&config.redis.url)
        .await
        .context("Failed to open Redis client")?;

    let notifier: Arc<dyn NotificationDispatcher> = Arc::new(
        KafkaNotifier::new(&config.kafka.brokers).context("Failed to create Kafka producer")?,
    );

    let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.pool.clone()));
    let bookings: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(db.pool.clone()));
    let manager = Arc::new(BookingManager::new(catalog, bookings, notifier));

    let state = AppState {
        manager,
        redis: Some(Arc::new(redis)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        business_rules: config.business_rules.clone(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
