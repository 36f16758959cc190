use crate::database::DatabaseService;
use crate::error::ApiError;
use crate::models::{CreateUserRequest, User};
use crate::services::TokenService;
use log::{debug, warn};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

pub struct AuthService;

impl AuthService {
    pub fn register_user(db: &DatabaseService, request: CreateUserRequest) -> Result<User, ApiError> {
        let user = db.create_user(request)?;
        debug!("User registered successfully: {}", user.username);
        Ok(user)
    }

    /// Checks the password against the stored hash and issues an access token.
    /// Disabled accounts are refused even when the password matches.
    pub fn authenticate_user(
        db: &DatabaseService,
        tokens: &TokenService,
        username: &str,
        password: &str,
    ) -> Result<(User, String), ApiError> {
        let Some(user) = db.get_user_by_username(username)? else {
            debug!("Login attempt for unknown user: {username}");
            return Err(ApiError::InvalidCredentials(BAD_CREDENTIALS.to_string()));
        };

        if !user.verify_password(password)? {
            warn!("Failed login for user: {username}");
            return Err(ApiError::InvalidCredentials(BAD_CREDENTIALS.to_string()));
        }

        if !user.is_active() {
            return Err(ApiError::InactiveAccount("Inactive user".to_string()));
        }

        let token = tokens.issue(&user.username, user.id)?;

        debug!("User authenticated successfully: {}", user.username);
        Ok((user, token))
    }

    /// Maps a bearer token to its active user.
    pub fn validate_token(
        db: &DatabaseService,
        tokens: &TokenService,
        token: &str,
    ) -> Result<User, ApiError> {
        let invalid = || ApiError::Unauthorized("Could not validate credentials".to_string());

        let claims = tokens.verify(token).ok_or_else(invalid)?;

        let user = db
            .get_user_by_username(&claims.sub)?
            .filter(|user| user.id == claims.id)
            .ok_or_else(invalid)?;

        if !user.is_active() {
            return Err(ApiError::InactiveAccount("Inactive user".to_string()));
        }

        Ok(user)
    }
}
