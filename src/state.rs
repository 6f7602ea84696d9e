//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum. El reloj
//! es inyectable para que los tests fijen "ahora".

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::utils::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            clock: Arc::new(SystemClock),
        }
    }
}
