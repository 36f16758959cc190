use crate::config::AppConfig;
use crate::database::DatabaseService;
use crate::services::TokenService;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub database: Arc<DatabaseService>,
    pub tokens: TokenService,
}
