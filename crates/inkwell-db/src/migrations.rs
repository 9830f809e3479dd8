use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub const SCHEMA_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version = current_version(conn)?;

    if version < 1 {
        info!("running migration v1 (profile, article, clap)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE profile (
                profileId               BLOB NOT NULL PRIMARY KEY CHECK (length(profileId) = 16),
                profileActivationToken  TEXT,
                profileFullName         TEXT NOT NULL,
                profileCaption          TEXT NOT NULL,
                profileEmail            TEXT NOT NULL UNIQUE,
                profileHash             TEXT NOT NULL,
                profilePhone            TEXT,
                profileSalt             TEXT NOT NULL
            );

            CREATE INDEX idx_profile_activation_token
                ON profile(profileActivationToken);

            CREATE TABLE article (
                articleId               BLOB NOT NULL PRIMARY KEY CHECK (length(articleId) = 16),
                articleAuthorProfileId  BLOB NOT NULL REFERENCES profile(profileId),
                articleContent          TEXT NOT NULL,
                articleDate             TEXT NOT NULL
            );

            CREATE INDEX idx_article_author
                ON article(articleAuthorProfileId);

            CREATE TABLE clap (
                clapArticleId   BLOB NOT NULL REFERENCES article(articleId),
                clapProfileId   BLOB NOT NULL REFERENCES profile(profileId),
                clapDate        TEXT NOT NULL,
                PRIMARY KEY (clapArticleId, clapProfileId)
            );

            CREATE INDEX idx_clap_profile
                ON clap(clapProfileId);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete (schema v{})", SCHEMA_VERSION);
    Ok(())
}

pub fn current_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}
