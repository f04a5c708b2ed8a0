pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;
pub mod events;
pub mod redis_repo;

pub use booking_repo::PgBookingStore;
pub use catalog_repo::PgCatalogStore;
pub use database::DbClient;
pub use events::KafkaNotifier;
pub use redis_repo::RedisClient;
