use rusqlite::{Connection, OptionalExtension, Params, Statement, params};
use tracing::debug;

use inkwell_types::Clap;
use inkwell_types::validate::{UuidInput, format_date, validate_uuid};

use super::Persist;
use crate::error::DbError;
use crate::models::ClapRow;

const SELECT_CLAP: &str = "SELECT clapArticleId, clapProfileId, clapDate FROM clap";

impl Persist for Clap {
    fn insert(&self, conn: &Connection) -> Result<(), DbError> {
        let (article_id, profile_id) = (self.article_id(), self.profile_id());
        conn.execute(
            "INSERT INTO clap (clapArticleId, clapProfileId, clapDate) VALUES (?1, ?2, ?3)",
            params![
                article_id.as_bytes().as_slice(),
                profile_id.as_bytes().as_slice(),
                format_date(&self.date()),
            ],
        )?;

        debug!(article_id = %article_id, profile_id = %profile_id, "clap inserted");
        Ok(())
    }

    /// Only the date can change; the ids are the key.
    fn update(&self, conn: &Connection) -> Result<(), DbError> {
        let (article_id, profile_id) = (self.article_id(), self.profile_id());
        let rows = conn.execute(
            "UPDATE clap SET clapDate = ?3 WHERE clapArticleId = ?1 AND clapProfileId = ?2",
            params![
                article_id.as_bytes().as_slice(),
                profile_id.as_bytes().as_slice(),
                format_date(&self.date()),
            ],
        )?;

        debug!(article_id = %article_id, profile_id = %profile_id, rows, "clap updated");
        Ok(())
    }

    fn delete(&self, conn: &Connection) -> Result<(), DbError> {
        let (article_id, profile_id) = (self.article_id(), self.profile_id());
        let rows = conn.execute(
            "DELETE FROM clap WHERE clapArticleId = ?1 AND clapProfileId = ?2",
            params![article_id.as_bytes().as_slice(), profile_id.as_bytes().as_slice()],
        )?;

        debug!(article_id = %article_id, profile_id = %profile_id, rows, "clap deleted");
        Ok(())
    }
}

pub fn get_clap_by_article_id_and_profile_id<'a, 'b>(
    conn: &Connection,
    article_id: impl Into<UuidInput<'a>>,
    profile_id: impl Into<UuidInput<'b>>,
) -> Result<Option<Clap>, DbError> {
    let article_id = validate_uuid("clapArticleId", article_id)?;
    let profile_id = validate_uuid("clapProfileId", profile_id)?;

    let mut stmt = conn.prepare(&format!(
        "{SELECT_CLAP} WHERE clapArticleId = ?1 AND clapProfileId = ?2"
    ))?;
    let row = stmt
        .query_row(
            params![article_id.as_bytes().as_slice(), profile_id.as_bytes().as_slice()],
            ClapRow::from_row,
        )
        .optional()?;

    row.map(ClapRow::into_clap).transpose()
}

pub fn get_claps_by_article_id<'a>(
    conn: &Connection,
    article_id: impl Into<UuidInput<'a>>,
) -> Result<Vec<Clap>, DbError> {
    let article_id = validate_uuid("clapArticleId", article_id)?;

    let mut stmt = conn.prepare(&format!("{SELECT_CLAP} WHERE clapArticleId = ?1 ORDER BY rowid"))?;
    collect_claps(&mut stmt, params![article_id.as_bytes().as_slice()])
}

pub fn get_claps_by_profile_id<'a>(
    conn: &Connection,
    profile_id: impl Into<UuidInput<'a>>,
) -> Result<Vec<Clap>, DbError> {
    let profile_id = validate_uuid("clapProfileId", profile_id)?;

    let mut stmt = conn.prepare(&format!("{SELECT_CLAP} WHERE clapProfileId = ?1 ORDER BY rowid"))?;
    collect_claps(&mut stmt, params![profile_id.as_bytes().as_slice()])
}

fn collect_claps(stmt: &mut Statement<'_>, params: impl Params) -> Result<Vec<Clap>, DbError> {
    let rows = stmt
        .query_map(params, ClapRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(ClapRow::into_clap).collect()
}
