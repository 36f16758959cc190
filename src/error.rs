use diesel::result::DatabaseErrorKind;
use rocket::http::{ContentType, Header, Status};
use rocket::response::{Responder, Response};
use rocket::Request;
use std::io::Cursor;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    InvalidCredentials(String),
    InactiveAccount(String),
    NotFound(String),
    Conflict(String),
    DatabaseError(String),
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Unauthorized(_) => Status::Unauthorized,
            ApiError::InvalidCredentials(_) => Status::Unauthorized,
            // Disabled accounts and reference conflicts are reported as 400
            ApiError::InactiveAccount(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::BadRequest,
            ApiError::DatabaseError(_) => Status::InternalServerError,
            ApiError::InternalServerError(_) => Status::InternalServerError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::InvalidCredentials(msg)
            | ApiError::InactiveAccount(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::DatabaseError(msg)
            | ApiError::InternalServerError(msg) => msg,
        }
    }

    fn wants_bearer_challenge(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials(_)
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status().code, self.message())
    }
}

impl std::error::Error for ApiError {}

/// Renders `{"detail": message}`, the body shape shared with the catchers.
pub fn detail_body(message: &str) -> String {
    serde_json::json!({ "detail": message }).to_string()
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            log::error!("Request failed: {}", self.message());
        }

        let body = detail_body(self.message());
        let mut response = Response::build();
        response
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body));

        if self.wants_bearer_challenge() {
            response.header(Header::new("WWW-Authenticate", "Bearer"));
        }

        response.ok()
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("Value already exists".to_string())
            }
            _ => ApiError::DatabaseError(format!("Database error: {err}")),
        }
    }
}

impl From<diesel::r2d2::Error> for ApiError {
    fn from(err: diesel::r2d2::Error) -> Self {
        ApiError::InternalServerError(format!("Database connection error: {err}"))
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::InternalServerError(format!("Password hashing error: {err}"))
    }
}
