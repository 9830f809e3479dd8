use rusqlite::{Connection, OptionalExtension, Params, Statement, params};
use tracing::debug;

use inkwell_types::validate::{UuidInput, format_date, sanitize_text, validate_uuid};
use inkwell_types::{Article, ValidationError};

use super::{Persist, glob_contains};
use crate::error::DbError;
use crate::models::ArticleRow;

const SELECT_ARTICLE: &str =
    "SELECT articleId, articleAuthorProfileId, articleContent, articleDate FROM article";

impl Persist for Article {
    fn insert(&self, conn: &Connection) -> Result<(), DbError> {
        let id = self.id();
        conn.execute(
            "INSERT INTO article (articleId, articleAuthorProfileId, articleContent, articleDate)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id.as_bytes().as_slice(),
                self.author_profile_id().as_bytes().as_slice(),
                self.content(),
                format_date(&self.date()),
            ],
        )?;

        debug!(article_id = %id, author = %self.author_profile_id(), "article inserted");
        Ok(())
    }

    fn update(&self, conn: &Connection) -> Result<(), DbError> {
        let id = self.id();
        let rows = conn.execute(
            "UPDATE article
             SET articleAuthorProfileId = ?2, articleContent = ?3, articleDate = ?4
             WHERE articleId = ?1",
            params![
                id.as_bytes().as_slice(),
                self.author_profile_id().as_bytes().as_slice(),
                self.content(),
                format_date(&self.date()),
            ],
        )?;

        debug!(article_id = %id, rows, "article updated");
        Ok(())
    }

    fn delete(&self, conn: &Connection) -> Result<(), DbError> {
        let id = self.id();
        let rows = conn.execute(
            "DELETE FROM article WHERE articleId = ?1",
            params![id.as_bytes().as_slice()],
        )?;

        debug!(article_id = %id, rows, "article deleted");
        Ok(())
    }
}

pub fn get_article_by_article_id<'a>(
    conn: &Connection,
    article_id: impl Into<UuidInput<'a>>,
) -> Result<Option<Article>, DbError> {
    let article_id = validate_uuid("articleId", article_id)?;

    let mut stmt = conn.prepare(&format!("{SELECT_ARTICLE} WHERE articleId = ?1"))?;
    let row = stmt
        .query_row(params![article_id.as_bytes().as_slice()], ArticleRow::from_row)
        .optional()?;

    row.map(ArticleRow::into_article).transpose()
}

pub fn get_articles_by_author_profile_id<'a>(
    conn: &Connection,
    profile_id: impl Into<UuidInput<'a>>,
) -> Result<Vec<Article>, DbError> {
    let profile_id = validate_uuid("articleAuthorProfileId", profile_id)?;

    let mut stmt = conn.prepare(&format!(
        "{SELECT_ARTICLE} WHERE articleAuthorProfileId = ?1 ORDER BY rowid"
    ))?;
    collect_articles(&mut stmt, params![profile_id.as_bytes().as_slice()])
}

/// Articles whose content contains `content`, case-sensitively.
pub fn get_articles_by_content(conn: &Connection, content: &str) -> Result<Vec<Article>, DbError> {
    let content = sanitize_text(content);
    if content.is_empty() {
        return Err(ValidationError::invalid("articleContent", "empty or insecure").into());
    }

    let mut stmt = conn.prepare(&format!(
        "{SELECT_ARTICLE} WHERE articleContent GLOB ?1 ORDER BY rowid"
    ))?;
    collect_articles(&mut stmt, params![glob_contains(&content)])
}

pub fn get_all_articles(conn: &Connection) -> Result<Vec<Article>, DbError> {
    let mut stmt = conn.prepare(&format!("{SELECT_ARTICLE} ORDER BY rowid"))?;
    collect_articles(&mut stmt, params![])
}

fn collect_articles(stmt: &mut Statement<'_>, params: impl Params) -> Result<Vec<Article>, DbError> {
    let rows = stmt
        .query_map(params, ArticleRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(ArticleRow::into_article).collect()
}
