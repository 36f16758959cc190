use crate::error::ApiError;
use crate::models::{
    AuthenticatedUser, CreateUserRequest, LoginForm, MessageResponse, TokenResponse, User,
};
use crate::services::AuthService;
use crate::state::AppState;
use log::info;
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::{State, get, post};

// OAuth2 password flow: form-encoded username and password
#[post("/api/auth/login", data = "<login_form>")]
pub async fn login(
    login_form: Form<LoginForm>,
    state: &State<AppState>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (user, token) = AuthService::authenticate_user(
        &state.database,
        &state.tokens,
        &login_form.username,
        &login_form.password,
    )?;

    info!("User logged in: {}", user.username);
    Ok(Json(TokenResponse::bearer(token)))
}

// Tokens are stateless, so logging out only needs a valid session
#[post("/api/auth/logout")]
pub async fn logout(user: AuthenticatedUser) -> Json<MessageResponse> {
    info!("User logged out: {}", user.user.username);
    Json(MessageResponse::new("Successfully logged out"))
}

#[get("/api/auth/me")]
pub async fn me(user: AuthenticatedUser) -> Json<User> {
    Json(user.user)
}

#[post("/api/auth/register", data = "<request>")]
pub async fn register(
    request: Json<CreateUserRequest>,
    state: &State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = AuthService::register_user(&state.database, request.into_inner())?;
    Ok(Json(user))
}
