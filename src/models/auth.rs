use crate::error::ApiError;
use crate::models::User;
use rocket::serde::{Deserialize, Serialize};
use rocket::{
    FromForm, State,
    request::{FromRequest, Outcome, Request},
};

// OAuth2 password-flow form; extra fields such as grant_type are ignored
#[derive(FromForm, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Payload of a signed bearer token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub id: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Why the authentication guard rejected a request. Stored in the request
/// local cache so the catchers can render it.
#[derive(Debug, Clone, Default)]
pub struct GuardFailure(pub Option<String>);

// Authentication guard resolving the bearer token to an active user
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }
}

fn reject(request: &Request<'_>, error: ApiError) -> Outcome<AuthenticatedUser, ApiError> {
    let status = error.status();
    let message = error.message().to_string();
    request.local_cache(|| GuardFailure(Some(message)));
    Outcome::Error((status, error))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        use crate::services::AuthService;
        use crate::state::AppState;

        let Some(state) = request.guard::<&State<AppState>>().await.succeeded() else {
            return reject(
                request,
                ApiError::InternalServerError("Application state unavailable".to_string()),
            );
        };

        let Some(auth_value) = request.headers().get_one("Authorization") else {
            return reject(
                request,
                ApiError::Unauthorized("Not authenticated".to_string()),
            );
        };

        let Some(token) = auth_value.strip_prefix("Bearer ") else {
            return reject(
                request,
                ApiError::Unauthorized("Invalid authorization format".to_string()),
            );
        };

        match AuthService::validate_token(&state.database, &state.tokens, token.trim()) {
            Ok(user) => Outcome::Success(AuthenticatedUser { user }),
            Err(error) => reject(request, error),
        }
    }
}
