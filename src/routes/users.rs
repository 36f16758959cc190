use crate::error::ApiError;
use crate::models::{
    AuthenticatedUser, CreateRoleRequest, CreateUserRequest, MessageResponse, Role,
    UpdateRoleRequest, UpdateUserRequest, User,
};
use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};

const DEFAULT_LIMIT: i64 = 100;

#[post("/api/users", data = "<request>")]
pub async fn create_user(
    request: Json<CreateUserRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state.database.create_user(request.into_inner())?;
    Ok(Json(user))
}

#[get("/api/users?<skip>&<limit>")]
pub async fn list_users(
    skip: Option<i64>,
    limit: Option<i64>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).max(0);

    Ok(Json(state.database.list_users(skip, limit)?))
}

#[get("/api/users/<id>")]
pub async fn get_user(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.database.get_user(id)?))
}

#[put("/api/users/<id>", data = "<request>")]
pub async fn update_user(
    id: i32,
    request: Json<UpdateUserRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state.database.update_user(id, request.into_inner())?;
    Ok(Json(user))
}

#[delete("/api/users/<id>")]
pub async fn delete_user(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.database.delete_user(id)?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// Roles

#[post("/api/users/roles", data = "<request>")]
pub async fn create_role(
    request: Json<CreateRoleRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Role>, ApiError> {
    let role = state.database.create_role(request.into_inner())?;
    Ok(Json(role))
}

#[get("/api/users/roles")]
pub async fn list_roles(
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<Role>>, ApiError> {
    Ok(Json(state.database.list_roles()?))
}

#[put("/api/users/roles/<id>", data = "<request>")]
pub async fn update_role(
    id: i32,
    request: Json<UpdateRoleRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Role>, ApiError> {
    let role = state.database.update_role(id, request.into_inner())?;
    Ok(Json(role))
}

#[delete("/api/users/roles/<id>")]
pub async fn delete_role(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.database.delete_role(id)?;
    Ok(Json(MessageResponse::new("Role deleted successfully")))
}
