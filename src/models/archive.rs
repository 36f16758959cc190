use crate::schema::{archive_categories, archives};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use rocket::FromForm;
use rocket::serde::{Deserialize, Serialize};

use super::deserialize_some;

pub const DEFAULT_ARCHIVE_TYPE: &str = "document";

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = archive_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArchiveCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = archive_categories)]
pub struct NewArchiveCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = archive_categories)]
pub struct UpdateArchiveCategory {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub parent_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = archives)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Archive {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub category_id: Option<i32>,
    pub archive_type: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = archives)]
pub struct NewArchive {
    pub title: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub category_id: Option<i32>,
    pub archive_type: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = archives)]
pub struct UpdateArchive {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub file_path: Option<Option<String>>,
    pub category_id: Option<Option<i32>>,
    pub archive_type: Option<String>,
    pub updated_at: NaiveDateTime,
}

// Request/Response models for API
#[derive(Deserialize, Debug)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<i32>>,
}

#[derive(Deserialize, Debug)]
pub struct CreateArchiveRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default = "default_archive_type")]
    pub archive_type: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateArchiveRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub file_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<i32>>,
    pub archive_type: Option<String>,
}

/// Query string of `GET /api/archive`. Pages are 1-indexed.
#[derive(FromForm, Debug, Clone)]
pub struct ArchiveFilter {
    #[field(default = 1)]
    pub page: i64,
    #[field(default = 10)]
    pub page_size: i64,
    pub name: Option<String>,
    pub category_id: Option<i32>,
}

impl Default for ArchiveFilter {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            name: None,
            category_id: None,
        }
    }
}

impl ArchiveFilter {
    /// Rows to skip, or `None` when the page lies beyond what `i64` can address.
    pub fn offset(&self) -> Option<i64> {
        self.page.checked_sub(1)?.checked_mul(self.page_size)
    }
}

fn default_archive_type() -> String {
    DEFAULT_ARCHIVE_TYPE.to_string()
}

impl NewArchiveCategory {
    pub fn new(name: String, description: Option<String>, parent_id: Option<i32>) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            name,
            description,
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<UpdateCategoryRequest> for UpdateArchiveCategory {
    fn from(request: UpdateCategoryRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            parent_id: request.parent_id,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl NewArchive {
    pub fn new(request: CreateArchiveRequest, created_by: i32) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            title: request.title,
            description: request.description,
            file_path: request.file_path,
            category_id: request.category_id,
            archive_type: request.archive_type,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<UpdateArchiveRequest> for UpdateArchive {
    fn from(request: UpdateArchiveRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            file_path: request.file_path,
            category_id: request.category_id,
            archive_type: request.archive_type,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
