pub mod article;
pub mod clap;
pub mod profile;

use rusqlite::Connection;

use crate::error::DbError;

/// Row-level writes for an entity, keyed by its primary key.
///
/// `update` and `delete` succeed when no row matches; the affected-row count
/// is only logged.
pub trait Persist {
    fn insert(&self, conn: &Connection) -> Result<(), DbError>;
    fn update(&self, conn: &Connection) -> Result<(), DbError>;
    fn delete(&self, conn: &Connection) -> Result<(), DbError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub profiles: u64,
    pub articles: u64,
    pub claps: u64,
}

pub fn table_counts(conn: &Connection) -> Result<TableCounts, DbError> {
    let count = |table: &str| -> Result<u64, DbError> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(n as u64)
    };

    Ok(TableCounts {
        profiles: count("profile")?,
        articles: count("article")?,
        claps: count("clap")?,
    })
}

/// Case-sensitive GLOB pattern matching `needle` anywhere in a column, with
/// `*`, `?` and `[` taken literally.
pub(crate) fn glob_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('*');
    for c in needle.chars() {
        match c {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('*');
    pattern
}
