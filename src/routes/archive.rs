use crate::error::ApiError;
use crate::models::{
    Archive, ArchiveCategory, ArchiveFilter, AuthenticatedUser, CreateArchiveRequest,
    CreateCategoryRequest, MessageResponse, UpdateArchiveRequest, UpdateCategoryRequest,
};
use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};

// Archive categories

#[post("/api/archive/category", data = "<request>")]
pub async fn create_category(
    request: Json<CreateCategoryRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<ArchiveCategory>, ApiError> {
    let category = state.database.create_archive_category(request.into_inner())?;
    Ok(Json(category))
}

#[get("/api/archive/category")]
pub async fn list_categories(
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<ArchiveCategory>>, ApiError> {
    Ok(Json(state.database.list_archive_categories()?))
}

#[put("/api/archive/category/<id>", data = "<request>")]
pub async fn update_category(
    id: i32,
    request: Json<UpdateCategoryRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<ArchiveCategory>, ApiError> {
    let category = state
        .database
        .update_archive_category(id, request.into_inner())?;
    Ok(Json(category))
}

#[delete("/api/archive/category/<id>")]
pub async fn delete_category(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.database.delete_archive_category(id)?;
    Ok(Json(MessageResponse::new("Archive category deleted successfully")))
}

// Archives

#[post("/api/archive", data = "<request>")]
pub async fn create_archive(
    request: Json<CreateArchiveRequest>,
    user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Archive>, ApiError> {
    let archive = state
        .database
        .create_archive(request.into_inner(), user.id())?;
    Ok(Json(archive))
}

#[get("/api/archive?<filter..>")]
pub async fn list_archives(
    filter: ArchiveFilter,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<Archive>>, ApiError> {
    if filter.page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }
    if filter.page_size < 1 {
        return Err(ApiError::BadRequest(
            "page_size must be at least 1".to_string(),
        ));
    }

    Ok(Json(state.database.list_archives(&filter)?))
}

#[get("/api/archive/<id>")]
pub async fn get_archive(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Archive>, ApiError> {
    Ok(Json(state.database.get_archive(id)?))
}

#[put("/api/archive/<id>", data = "<request>")]
pub async fn update_archive(
    id: i32,
    request: Json<UpdateArchiveRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Archive>, ApiError> {
    let archive = state.database.update_archive(id, request.into_inner())?;
    Ok(Json(archive))
}

#[delete("/api/archive/<id>")]
pub async fn delete_archive(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.database.delete_archive(id)?;
    Ok(Json(MessageResponse::new("Archive deleted successfully")))
}
