//! Raw row types, read column-for-column from SQLite.
//!
//! Rows are turned into entities through the same constructors callers use,
//! so a row that no longer passes validation surfaces as
//! [`DbError::CorruptRow`] instead of a half-built entity.

use rusqlite::Row;

use inkwell_types::{Article, Clap, Profile, ProfileFields};

use crate::error::DbError;

pub struct ProfileRow {
    pub profile_id: Vec<u8>,
    pub activation_token: Option<String>,
    pub full_name: String,
    pub caption: String,
    pub email: String,
    pub hash: String,
    pub phone: Option<String>,
    pub salt: String,
}

impl ProfileRow {
    /// Expects the column order of `queries::profile::SELECT_PROFILE`.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            profile_id: row.get(0)?,
            activation_token: row.get(1)?,
            full_name: row.get(2)?,
            caption: row.get(3)?,
            email: row.get(4)?,
            hash: row.get(5)?,
            phone: row.get(6)?,
            salt: row.get(7)?,
        })
    }

    pub fn into_profile(self) -> Result<Profile, DbError> {
        Profile::new(ProfileFields {
            profile_id: (&self.profile_id).into(),
            activation_token: self.activation_token.as_deref(),
            full_name: &self.full_name,
            caption: &self.caption,
            email: &self.email,
            hash: &self.hash,
            phone: self.phone.as_deref(),
            salt: &self.salt,
        })
        .map_err(DbError::corrupt_row("profile"))
    }
}

pub struct ArticleRow {
    pub article_id: Vec<u8>,
    pub author_profile_id: Vec<u8>,
    pub content: String,
    pub date: String,
}

impl ArticleRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            article_id: row.get(0)?,
            author_profile_id: row.get(1)?,
            content: row.get(2)?,
            date: row.get(3)?,
        })
    }

    pub fn into_article(self) -> Result<Article, DbError> {
        Article::new(
            &self.article_id,
            &self.author_profile_id,
            &self.content,
            &self.date,
        )
        .map_err(DbError::corrupt_row("article"))
    }
}

pub struct ClapRow {
    pub article_id: Vec<u8>,
    pub profile_id: Vec<u8>,
    pub date: String,
}

impl ClapRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            article_id: row.get(0)?,
            profile_id: row.get(1)?,
            date: row.get(2)?,
        })
    }

    pub fn into_clap(self) -> Result<Clap, DbError> {
        Clap::new(&self.article_id, &self.profile_id, &self.date)
            .map_err(DbError::corrupt_row("clap"))
    }
}
