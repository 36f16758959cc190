use super::categories::category_tree;
use super::service::DatabaseService;
use crate::error::ApiError;
use crate::models::{
    Archive, ArchiveCategory, ArchiveFilter, CreateArchiveRequest, CreateCategoryRequest,
    NewArchive, NewArchiveCategory, UpdateArchive, UpdateArchiveCategory, UpdateArchiveRequest,
    UpdateCategoryRequest,
};
use crate::schema::{archive_categories, archives};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use log::debug;

category_tree!(archive_categories, ArchiveCategory, "Archive category");

fn find_archive(conn: &mut SqliteConnection, archive_id: i32) -> Result<Archive, ApiError> {
    archives::table
        .find(archive_id)
        .first::<Archive>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Archive not found".to_string()))
}

impl DatabaseService {
    pub fn create_archive_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<ArchiveCategory, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            if let Some(parent_id) = request.parent_id {
                ensure_parent(conn, parent_id)?;
            }

            let new_category =
                NewArchiveCategory::new(request.name, request.description, request.parent_id);

            let category = diesel::insert_into(archive_categories::table)
                .values(&new_category)
                .returning(ArchiveCategory::as_returning())
                .get_result(conn)?;

            debug!("Archive category created: {} (id {})", category.name, category.id);
            Ok(category)
        })
    }

    pub fn list_archive_categories(&self) -> Result<Vec<ArchiveCategory>, ApiError> {
        let mut conn = self.get_connection()?;

        Ok(archive_categories::table
            .order(archive_categories::id.asc())
            .load::<ArchiveCategory>(&mut conn)?)
    }

    pub fn update_archive_category(
        &self,
        category_id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<ArchiveCategory, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_category(conn, category_id)?;

            if let Some(Some(parent_id)) = request.parent_id {
                ensure_parent(conn, parent_id)?;
                ensure_no_cycle(conn, category_id, parent_id)?;
            }

            let changes = UpdateArchiveCategory::from(request);

            let category = diesel::update(archive_categories::table.find(category_id))
                .set(&changes)
                .returning(ArchiveCategory::as_returning())
                .get_result(conn)?;

            Ok(category)
        })
    }

    /// Deletes a leaf category that holds no archives.
    pub fn delete_archive_category(&self, category_id: i32) -> Result<(), ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_category(conn, category_id)?;

            let child_count: i64 = archive_categories::table
                .filter(archive_categories::parent_id.eq(category_id))
                .count()
                .get_result(conn)?;

            if child_count > 0 {
                return Err(ApiError::Conflict(
                    "Cannot delete category with children".to_string(),
                ));
            }

            let archive_count: i64 = archives::table
                .filter(archives::category_id.eq(category_id))
                .count()
                .get_result(conn)?;

            if archive_count > 0 {
                return Err(ApiError::Conflict(
                    "Cannot delete category with archives".to_string(),
                ));
            }

            diesel::delete(archive_categories::table.find(category_id)).execute(conn)?;

            debug!("Archive category deleted: id {category_id}");
            Ok(())
        })
    }

    // Archive operations
    pub fn create_archive(
        &self,
        request: CreateArchiveRequest,
        created_by: i32,
    ) -> Result<Archive, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            if let Some(category_id) = request.category_id {
                ensure_category(conn, category_id)?;
            }

            let new_archive = NewArchive::new(request, created_by);

            let archive = diesel::insert_into(archives::table)
                .values(&new_archive)
                .returning(Archive::as_returning())
                .get_result(conn)?;

            debug!("Archive created: {} (id {})", archive.title, archive.id);
            Ok(archive)
        })
    }

    /// Pages through archives in insertion order, optionally narrowed by a
    /// title substring and an exact category.
    pub fn list_archives(&self, filter: &ArchiveFilter) -> Result<Vec<Archive>, ApiError> {
        let offset = filter
            .offset()
            .ok_or_else(|| ApiError::BadRequest("page is out of range".to_string()))?;

        let mut conn = self.get_connection()?;

        let mut query = archives::table.into_boxed::<Sqlite>();

        if let Some(category_id) = filter.category_id {
            query = query.filter(archives::category_id.eq(category_id));
        }

        if let Some(name) = filter.name.as_deref().filter(|name| !name.is_empty()) {
            query = query.filter(archives::title.like(format!("%{name}%")));
        }

        Ok(query
            .order(archives::id.asc())
            .offset(offset)
            .limit(filter.page_size)
            .load::<Archive>(&mut conn)?)
    }

    pub fn get_archive(&self, archive_id: i32) -> Result<Archive, ApiError> {
        let mut conn = self.get_connection()?;
        find_archive(&mut conn, archive_id)
    }

    pub fn update_archive(
        &self,
        archive_id: i32,
        request: UpdateArchiveRequest,
    ) -> Result<Archive, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_archive(conn, archive_id)?;

            if let Some(Some(category_id)) = request.category_id {
                ensure_category(conn, category_id)?;
            }

            let changes = UpdateArchive::from(request);

            let archive = diesel::update(archives::table.find(archive_id))
                .set(&changes)
                .returning(Archive::as_returning())
                .get_result(conn)?;

            Ok(archive)
        })
    }

    pub fn delete_archive(&self, archive_id: i32) -> Result<(), ApiError> {
        let mut conn = self.get_connection()?;

        let deleted = diesel::delete(archives::table.find(archive_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound("Archive not found".to_string()));
        }

        debug!("Archive deleted: id {archive_id}");
        Ok(())
    }
}
