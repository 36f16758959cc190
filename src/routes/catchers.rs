use crate::error::{ApiError, detail_body};
use crate::models::GuardFailure;
use rocket::http::Status;
use rocket::response::content::RawJson;
use rocket::response::status::Custom;
use rocket::{Request, catch};

// Message left behind by a failed authentication guard, if any
fn guard_message(req: &Request<'_>) -> Option<String> {
    req.local_cache(GuardFailure::default).0.clone()
}

#[catch(400)]
pub fn bad_request(req: &Request<'_>) -> ApiError {
    ApiError::BadRequest(guard_message(req).unwrap_or_else(|| "Bad Request".to_string()))
}

#[catch(401)]
pub fn unauthorized(req: &Request<'_>) -> ApiError {
    ApiError::Unauthorized(guard_message(req).unwrap_or_else(|| "Not authenticated".to_string()))
}

#[catch(404)]
pub fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

#[catch(422)]
pub fn unprocessable_entity() -> Custom<RawJson<String>> {
    Custom(
        Status::UnprocessableEntity,
        RawJson(detail_body("Unprocessable Entity")),
    )
}

#[catch(500)]
pub fn internal_error(req: &Request<'_>) -> ApiError {
    ApiError::InternalServerError(
        guard_message(req).unwrap_or_else(|| "Internal Server Error".to_string()),
    )
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request<'_>) -> Custom<RawJson<String>> {
    Custom(
        status,
        RawJson(detail_body(status.reason().unwrap_or("Unknown Error"))),
    )
}
