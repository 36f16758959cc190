use crate::schema::{knowledge_article_tags, knowledge_articles, knowledge_categories, knowledge_tags};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use rocket::FromForm;
use rocket::serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::archive::UpdateCategoryRequest;
use super::deserialize_some;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(format!("Unknown article status '{other}'")),
        }
    }
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = knowledge_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KnowledgeCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = knowledge_categories)]
pub struct NewKnowledgeCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = knowledge_categories)]
pub struct UpdateKnowledgeCategory {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub parent_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = knowledge_articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KnowledgeArticle {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Option<String>,
    pub category_id: Option<i32>,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = knowledge_articles)]
pub struct NewKnowledgeArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Option<String>,
    pub category_id: Option<i32>,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = knowledge_articles)]
pub struct UpdateKnowledgeArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<Option<String>>,
    pub tags: Option<Option<String>>,
    pub category_id: Option<Option<i32>>,
    pub status: Option<String>,
    pub published_at: Option<Option<NaiveDateTime>>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = knowledge_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KnowledgeTag {
    pub id: i32,
    pub name: String,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = knowledge_tags)]
pub struct NewKnowledgeTag {
    pub name: String,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = knowledge_article_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArticleTagLink {
    pub article_id: i32,
    pub tag_id: i32,
    pub position: i32,
}

// Request models for API
#[derive(Deserialize, Debug)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub status: ArticleStatus,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub tags: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<i32>>,
    pub status: Option<ArticleStatus>,
}

#[derive(FromForm, Debug, Clone)]
pub struct ArticleFilter {
    #[field(default = 0)]
    pub skip: i64,
    #[field(default = 100)]
    pub limit: i64,
    pub category_id: Option<i32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            category_id: None,
            status: None,
            search: None,
        }
    }
}

/// Splits a comma-separated tag field into trimmed, non-empty names.
/// Repeated names are kept; each occurrence counts as one use.
pub fn parse_tag_names(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl KnowledgeArticle {
    pub fn article_status(&self) -> ArticleStatus {
        self.status.parse().unwrap_or_default()
    }
}

impl NewKnowledgeCategory {
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

impl From<UpdateCategoryRequest> for UpdateKnowledgeCategory {
    fn from(request: UpdateCategoryRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            parent_id: request.parent_id,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl NewKnowledgeArticle {
    pub fn new(request: CreateArticleRequest, created_by: i32) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let published_at = (request.status == ArticleStatus::Published).then_some(now);

        Self {
            title: request.title,
            content: request.content,
            summary: request.summary,
            tags: request.tags,
            category_id: request.category_id,
            status: request.status.to_string(),
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
            published_at,
        }
    }
}

impl UpdateKnowledgeArticle {
    /// Merges the supplied fields and applies the publish-state transition
    /// relative to `current`.
    pub fn for_article(current: &KnowledgeArticle, request: UpdateArticleRequest) -> Self {
        let now = chrono::Utc::now().naive_utc();

        let published_at = match (current.article_status(), request.status) {
            (ArticleStatus::Draft, Some(ArticleStatus::Published)) => {
                Some(Some(current.published_at.unwrap_or(now)))
            }
            (ArticleStatus::Published, Some(ArticleStatus::Draft)) => Some(None),
            _ => None,
        };

        Self {
            title: request.title,
            content: request.content,
            summary: request.summary,
            tags: request.tags,
            category_id: request.category_id,
            status: request.status.map(|status| status.to_string()),
            published_at,
            updated_at: Some(now),
        }
    }

    pub fn published(at: NaiveDateTime) -> Self {
        Self {
            status: Some(ArticleStatus::Published.to_string()),
            published_at: Some(Some(at)),
            updated_at: Some(chrono::Utc::now().naive_utc()),
            ..Self::default()
        }
    }

    pub fn unpublished() -> Self {
        Self {
            status: Some(ArticleStatus::Draft.to_string()),
            published_at: Some(None),
            updated_at: Some(chrono::Utc::now().naive_utc()),
            ..Self::default()
        }
    }
}

impl NewKnowledgeTag {
    pub fn new(name: String) -> Self {
        Self {
            name,
            usage_count: 1,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
