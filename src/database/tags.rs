//! Tag usage bookkeeping for knowledge articles.
//!
//! Every tag token of an article is stored as one `knowledge_article_tags`
//! row and counted once in `knowledge_tags.usage_count`. Repeated tokens in
//! the same article are counted each time they appear. Counts never drop
//! below zero.

use super::service::DatabaseService;
use crate::error::ApiError;
use crate::models::{ArticleTagLink, KnowledgeTag, NewKnowledgeTag};
use crate::schema::{knowledge_article_tags, knowledge_tags};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// Bumps the count of each named tag, creating missing tags at 1. Returns
/// the tag ids in the order given.
pub(crate) fn increment_tags(
    conn: &mut SqliteConnection,
    names: &[String],
) -> Result<Vec<i32>, ApiError> {
    let mut tag_ids = Vec::with_capacity(names.len());

    for name in names {
        let existing = knowledge_tags::table
            .filter(knowledge_tags::name.eq(name))
            .select(knowledge_tags::id)
            .first::<i32>(conn)
            .optional()?;

        let tag_id = match existing {
            Some(tag_id) => {
                diesel::update(knowledge_tags::table.find(tag_id))
                    .set(knowledge_tags::usage_count.eq(knowledge_tags::usage_count + 1))
                    .execute(conn)?;
                tag_id
            }
            None => diesel::insert_into(knowledge_tags::table)
                .values(&NewKnowledgeTag::new(name.clone()))
                .returning(knowledge_tags::id)
                .get_result::<i32>(conn)?,
        };

        tag_ids.push(tag_id);
    }

    Ok(tag_ids)
}

/// Decrements every tag linked to the article (once per link row) and
/// removes the links.
pub(crate) fn release_article_tags(
    conn: &mut SqliteConnection,
    article_id: i32,
) -> Result<(), ApiError> {
    let tag_ids = knowledge_article_tags::table
        .filter(knowledge_article_tags::article_id.eq(article_id))
        .order(knowledge_article_tags::position.asc())
        .select(knowledge_article_tags::tag_id)
        .load::<i32>(conn)?;

    for tag_id in tag_ids {
        diesel::update(
            knowledge_tags::table
                .find(tag_id)
                .filter(knowledge_tags::usage_count.gt(0)),
        )
        .set(knowledge_tags::usage_count.eq(knowledge_tags::usage_count - 1))
        .execute(conn)?;
    }

    diesel::delete(
        knowledge_article_tags::table.filter(knowledge_article_tags::article_id.eq(article_id)),
    )
    .execute(conn)?;

    Ok(())
}

/// Counts the given tag names against the article and records the links.
pub(crate) fn attach_article_tags(
    conn: &mut SqliteConnection,
    article_id: i32,
    names: &[String],
) -> Result<(), ApiError> {
    let tag_ids = increment_tags(conn, names)?;

    let links: Vec<ArticleTagLink> = tag_ids
        .into_iter()
        .enumerate()
        .map(|(position, tag_id)| ArticleTagLink {
            article_id,
            tag_id,
            position: position as i32,
        })
        .collect();

    if !links.is_empty() {
        diesel::insert_into(knowledge_article_tags::table)
            .values(&links)
            .execute(conn)?;
    }

    Ok(())
}

impl DatabaseService {
    pub fn list_knowledge_tags(&self) -> Result<Vec<KnowledgeTag>, ApiError> {
        let mut conn = self.get_connection()?;

        Ok(knowledge_tags::table
            .order(knowledge_tags::id.asc())
            .load::<KnowledgeTag>(&mut conn)?)
    }
}
