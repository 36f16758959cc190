use log::info;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
    pub admin_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Nanya Hospital Backend".to_string(),
            app_version: "1.0.0".to_string(),
            port: 8000,
            host: "127.0.0.1".to_string(),
            database_url: "./data/app.db".to_string(),
            secret_key: "your-secret-key-here".to_string(),
            access_token_expire_minutes: 30,
            cors_origins: vec!["*".to_string()],
            admin_password: "admin123".to_string(),
        }
    }
}

impl AppConfig {
    /// True when any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|origin| origin == "*")
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let app_name = env::var("HMS_APP_NAME").unwrap_or(defaults.app_name);
        let app_version = env::var("HMS_APP_VERSION").unwrap_or(defaults.app_version);

        let port = env::var("HMS_PORT")
            .ok()
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let host = env::var("HMS_HOST").unwrap_or(defaults.host);

        let database_url = env::var("HMS_DATABASE_URL").unwrap_or(defaults.database_url);

        let secret_key = env::var("HMS_SECRET_KEY").unwrap_or(defaults.secret_key);

        let access_token_expire_minutes = env::var("HMS_ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(defaults.access_token_expire_minutes);

        let cors_origins = env::var("HMS_CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors_origins);

        let admin_password = env::var("HMS_ADMIN_PASSWORD").unwrap_or(defaults.admin_password);

        info!("Configuration loaded:");
        info!("  Application: {app_name} {app_version}");
        info!("  Host: {host}");
        info!("  Port: {port}");
        info!("  Database URL: {database_url}");
        info!("  Token lifetime: {access_token_expire_minutes} minutes");
        info!("  CORS origins: {}", cors_origins.join(", "));

        Self {
            app_name,
            app_version,
            port,
            host,
            database_url,
            secret_key,
            access_token_expire_minutes,
            cors_origins,
            admin_password,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
