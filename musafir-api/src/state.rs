use std::sync::Arc;

use musafir_booking::BookingManager;
use musafir_store::app_config::BusinessRules;
use musafir_store::RedisClient;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<BookingManager>,
    /// Absent in tests; the rate limiter fails open without it.
    pub redis: Option<Arc<RedisClient>>,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}
