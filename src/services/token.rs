//! Signed bearer tokens: HS256 JWTs carrying [`Claims`].

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::debug;

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_minutes", &self.ttl.num_minutes())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: &AppConfig) -> Self {
        let secret = config.secret_key.as_bytes();

        // Only HS256 is accepted and `exp` is enforced without grace
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(config.access_token_expire_minutes),
        }
    }

    pub fn issue(&self, username: &str, user_id: i32) -> Result<String, ApiError> {
        self.issue_with_ttl(username, user_id, self.ttl)
    }

    pub fn issue_with_ttl(
        &self,
        username: &str,
        user_id: i32,
        ttl: Duration,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::InternalServerError(format!("Token encoding error: {e}")))
    }

    /// Returns the claims of a well-formed, correctly signed, unexpired token.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Token rejected: {e}");
                None
            }
        }
    }
}
