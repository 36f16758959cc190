use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, get};

#[get("/")]
pub async fn index(state: &State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("Welcome to {}", state.config.app_name),
        "version": state.config.app_version,
    }))
}

#[get("/health")]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy"
    }))
}
