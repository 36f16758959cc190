use crate::error::ApiError;
use crate::models::{
    ArticleFilter, AuthenticatedUser, CreateArticleRequest, CreateCategoryRequest,
    KnowledgeArticle, KnowledgeCategory, KnowledgeTag, MessageResponse, UpdateArticleRequest,
    UpdateCategoryRequest,
};
use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};

#[get("/api/knowledge/tag")]
pub async fn list_tags(
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<KnowledgeTag>>, ApiError> {
    Ok(Json(state.database.list_knowledge_tags()?))
}

// Knowledge categories

#[post("/api/knowledge/category", data = "<request>")]
pub async fn create_category(
    request: Json<CreateCategoryRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeCategory>, ApiError> {
    let category = state
        .database
        .create_knowledge_category(request.into_inner())?;
    Ok(Json(category))
}

#[get("/api/knowledge/category")]
pub async fn list_categories(
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<KnowledgeCategory>>, ApiError> {
    Ok(Json(state.database.list_knowledge_categories()?))
}

#[put("/api/knowledge/category/<id>", data = "<request>")]
pub async fn update_category(
    id: i32,
    request: Json<UpdateCategoryRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeCategory>, ApiError> {
    let category = state
        .database
        .update_knowledge_category(id, request.into_inner())?;
    Ok(Json(category))
}

#[delete("/api/knowledge/category/<id>")]
pub async fn delete_category(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.database.delete_knowledge_category(id)?;
    Ok(Json(MessageResponse::new("Knowledge category deleted successfully")))
}

// Articles

#[post("/api/knowledge", data = "<request>")]
pub async fn create_article(
    request: Json<CreateArticleRequest>,
    user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeArticle>, ApiError> {
    let article = state
        .database
        .create_knowledge_article(request.into_inner(), user.id())?;
    Ok(Json(article))
}

#[get("/api/knowledge?<filter..>")]
pub async fn list_articles(
    filter: ArticleFilter,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<Vec<KnowledgeArticle>>, ApiError> {
    Ok(Json(state.database.list_knowledge_articles(&filter)?))
}

#[get("/api/knowledge/<id>")]
pub async fn get_article(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeArticle>, ApiError> {
    Ok(Json(state.database.get_knowledge_article(id)?))
}

#[put("/api/knowledge/<id>", data = "<request>")]
pub async fn update_article(
    id: i32,
    request: Json<UpdateArticleRequest>,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeArticle>, ApiError> {
    let article = state
        .database
        .update_knowledge_article(id, request.into_inner())?;
    Ok(Json(article))
}

// Ranked below the category routes, which share the same shape
#[put("/api/knowledge/<id>/publish", rank = 2)]
pub async fn publish_article(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeArticle>, ApiError> {
    Ok(Json(state.database.publish_knowledge_article(id)?))
}

#[put("/api/knowledge/<id>/unpublish", rank = 2)]
pub async fn unpublish_article(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<KnowledgeArticle>, ApiError> {
    Ok(Json(state.database.unpublish_knowledge_article(id)?))
}

#[delete("/api/knowledge/<id>")]
pub async fn delete_article(
    id: i32,
    _user: AuthenticatedUser,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.database.delete_knowledge_article(id)?;
    Ok(Json(MessageResponse::new("Knowledge article deleted successfully")))
}
