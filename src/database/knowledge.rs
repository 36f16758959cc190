use super::categories::category_tree;
use super::service::DatabaseService;
use super::tags::{attach_article_tags, release_article_tags};
use crate::error::ApiError;
use crate::models::{
    ArticleFilter, CreateArticleRequest, CreateCategoryRequest, KnowledgeArticle,
    KnowledgeCategory, NewKnowledgeArticle, NewKnowledgeCategory, UpdateArticleRequest,
    UpdateCategoryRequest, UpdateKnowledgeArticle, UpdateKnowledgeCategory, parse_tag_names,
};
use crate::schema::{knowledge_articles, knowledge_categories};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use log::debug;

category_tree!(knowledge_categories, KnowledgeCategory, "Knowledge category");

fn find_article(conn: &mut SqliteConnection, article_id: i32) -> Result<KnowledgeArticle, ApiError> {
    knowledge_articles::table
        .find(article_id)
        .first::<KnowledgeArticle>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Knowledge article not found".to_string()))
}

impl DatabaseService {
    pub fn create_knowledge_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<KnowledgeCategory, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            if let Some(parent_id) = request.parent_id {
                ensure_parent(conn, parent_id)?;
            }

            let new_category =
                NewKnowledgeCategory::new(request.name, request.description, request.parent_id);

            let category = diesel::insert_into(knowledge_categories::table)
                .values(&new_category)
                .returning(KnowledgeCategory::as_returning())
                .get_result(conn)?;

            debug!("Knowledge category created: {} (id {})", category.name, category.id);
            Ok(category)
        })
    }

    pub fn list_knowledge_categories(&self) -> Result<Vec<KnowledgeCategory>, ApiError> {
        let mut conn = self.get_connection()?;

        Ok(knowledge_categories::table
            .order(knowledge_categories::id.asc())
            .load::<KnowledgeCategory>(&mut conn)?)
    }

    pub fn update_knowledge_category(
        &self,
        category_id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<KnowledgeCategory, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_category(conn, category_id)?;

            if let Some(Some(parent_id)) = request.parent_id {
                ensure_parent(conn, parent_id)?;
                ensure_no_cycle(conn, category_id, parent_id)?;
            }

            let changes = UpdateKnowledgeCategory::from(request);

            let category = diesel::update(knowledge_categories::table.find(category_id))
                .set(&changes)
                .returning(KnowledgeCategory::as_returning())
                .get_result(conn)?;

            Ok(category)
        })
    }

    pub fn delete_knowledge_category(&self, category_id: i32) -> Result<(), ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_category(conn, category_id)?;

            let child_count: i64 = knowledge_categories::table
                .filter(knowledge_categories::parent_id.eq(category_id))
                .count()
                .get_result(conn)?;

            if child_count > 0 {
                return Err(ApiError::Conflict(
                    "Cannot delete category with children".to_string(),
                ));
            }

            let article_count: i64 = knowledge_articles::table
                .filter(knowledge_articles::category_id.eq(category_id))
                .count()
                .get_result(conn)?;

            if article_count > 0 {
                return Err(ApiError::Conflict(
                    "Cannot delete category with articles".to_string(),
                ));
            }

            diesel::delete(knowledge_categories::table.find(category_id)).execute(conn)?;

            debug!("Knowledge category deleted: id {category_id}");
            Ok(())
        })
    }

    // Article operations
    pub fn create_knowledge_article(
        &self,
        request: CreateArticleRequest,
        created_by: i32,
    ) -> Result<KnowledgeArticle, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            if let Some(category_id) = request.category_id {
                ensure_category(conn, category_id)?;
            }

            let tag_names = parse_tag_names(request.tags.as_deref());
            let new_article = NewKnowledgeArticle::new(request, created_by);

            let article = diesel::insert_into(knowledge_articles::table)
                .values(&new_article)
                .returning(KnowledgeArticle::as_returning())
                .get_result(conn)?;

            attach_article_tags(conn, article.id, &tag_names)?;

            debug!(
                "Knowledge article created: {} (id {}, {} tags)",
                article.title,
                article.id,
                tag_names.len()
            );
            Ok(article)
        })
    }

    /// Lists articles in insertion order. `search` matches title, content or
    /// the raw tag string.
    pub fn list_knowledge_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<KnowledgeArticle>, ApiError> {
        let mut conn = self.get_connection()?;

        let mut query = knowledge_articles::table.into_boxed::<Sqlite>();

        if let Some(category_id) = filter.category_id {
            query = query.filter(knowledge_articles::category_id.eq(category_id));
        }

        if let Some(status) = filter.status.as_deref().filter(|status| !status.is_empty()) {
            query = query.filter(knowledge_articles::status.eq(status.to_string()));
        }

        if let Some(search) = filter.search.as_deref().filter(|search| !search.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(
                knowledge_articles::title
                    .like(pattern.clone())
                    .or(knowledge_articles::content.like(pattern.clone()))
                    .or(knowledge_articles::tags.like(pattern)),
            );
        }

        Ok(query
            .order(knowledge_articles::id.asc())
            .offset(filter.skip.max(0))
            .limit(filter.limit.max(0))
            .load::<KnowledgeArticle>(&mut conn)?)
    }

    pub fn get_knowledge_article(&self, article_id: i32) -> Result<KnowledgeArticle, ApiError> {
        let mut conn = self.get_connection()?;
        find_article(&mut conn, article_id)
    }

    /// Partial update. When `tags` is supplied the old tags are released
    /// before the new ones are counted.
    pub fn update_knowledge_article(
        &self,
        article_id: i32,
        request: UpdateArticleRequest,
    ) -> Result<KnowledgeArticle, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let current = find_article(conn, article_id)?;

            if let Some(Some(category_id)) = request.category_id {
                ensure_category(conn, category_id)?;
            }

            if let Some(tags) = &request.tags {
                release_article_tags(conn, article_id)?;
                attach_article_tags(conn, article_id, &parse_tag_names(tags.as_deref()))?;
            }

            let changes = UpdateKnowledgeArticle::for_article(&current, request);

            let article = diesel::update(knowledge_articles::table.find(article_id))
                .set(&changes)
                .returning(KnowledgeArticle::as_returning())
                .get_result(conn)?;

            debug!("Knowledge article updated: id {} ({})", article.id, article.status);
            Ok(article)
        })
    }

    /// Forces the published state. An existing publish time is kept.
    pub fn publish_knowledge_article(&self, article_id: i32) -> Result<KnowledgeArticle, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let current = find_article(conn, article_id)?;
            let published_at = current
                .published_at
                .unwrap_or_else(|| chrono::Utc::now().naive_utc());

            let article = diesel::update(knowledge_articles::table.find(article_id))
                .set(&UpdateKnowledgeArticle::published(published_at))
                .returning(KnowledgeArticle::as_returning())
                .get_result(conn)?;

            Ok(article)
        })
    }

    pub fn unpublish_knowledge_article(
        &self,
        article_id: i32,
    ) -> Result<KnowledgeArticle, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_article(conn, article_id)?;

            let article = diesel::update(knowledge_articles::table.find(article_id))
                .set(&UpdateKnowledgeArticle::unpublished())
                .returning(KnowledgeArticle::as_returning())
                .get_result(conn)?;

            Ok(article)
        })
    }

    pub fn delete_knowledge_article(&self, article_id: i32) -> Result<(), ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_article(conn, article_id)?;
            release_article_tags(conn, article_id)?;
            diesel::delete(knowledge_articles::table.find(article_id)).execute(conn)?;

            debug!("Knowledge article deleted: id {article_id}");
            Ok(())
        })
    }
}
