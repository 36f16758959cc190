pub mod config;
pub mod database;
pub mod error;
pub mod fairings;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;

use rocket::Config;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::sync::Arc;

pub use config::AppConfig;
pub use database::DatabaseService;
pub use fairings::RequestLogger;
pub use services::{AuthService, TokenService};
pub use state::AppState;

pub fn create_rocket() -> rocket::Rocket<rocket::Build> {
    // Load configuration from environment
    let config = AppConfig::from_env();
    build_rocket(config)
}

pub fn build_rocket(config: AppConfig) -> rocket::Rocket<rocket::Build> {
    // Initialize database service (creates the file and runs migrations)
    let database =
        Arc::new(DatabaseService::new(&config.database_url).expect("Failed to initialize database"));

    // First-run administrator; failures are logged and startup continues
    database.ensure_default_admin(&config.admin_password);

    let tokens = TokenService::new(&config);

    // Configure CORS
    let allowed_origins = if config.allows_any_origin() {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&config.cors_origins)
    };

    let cors = CorsOptions {
        allowed_origins,
        allowed_headers: AllowedHeaders::all(),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
    .expect("Failed to create CORS configuration");

    // Configure Rocket with custom host and port
    let rocket_config = Config {
        port: config.port,
        address: config.host.parse().expect("Invalid host address"),
        ..Config::default()
    };

    let state = AppState {
        config,
        database,
        tokens,
    };

    rocket::custom(&rocket_config)
        .manage(state)
        .attach(cors)
        .attach(RequestLogger)
        .mount("/", routes::get_routes())
        .register("/", routes::get_catchers())
}
