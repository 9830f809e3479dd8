use anyhow::{Result, bail};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use inkwell_db::queries::article::{get_all_articles, get_article_by_article_id};
use inkwell_db::queries::clap::get_claps_by_article_id;
use inkwell_db::queries::profile::{get_profile_by_email, get_profile_by_profile_id};
use inkwell_db::{Database, DbError, Persist};
use inkwell_types::credentials::{
    generate_activation_token, generate_salt, hash_password, verify_password,
};
use inkwell_types::{Article, Clap, DateInput, Profile, ProfileFields};

pub struct NewProfile<'a> {
    pub full_name: &'a str,
    pub caption: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password: &'a str,
}

pub fn add_profile(db: &Database, req: NewProfile<'_>) -> Result<Profile> {
    let salt = generate_salt();
    let hash = hash_password(req.password, &salt)?;
    let token = generate_activation_token();

    let profile = Profile::new(ProfileFields {
        profile_id: Uuid::new_v4().into(),
        activation_token: Some(&token),
        full_name: req.full_name,
        caption: req.caption,
        email: req.email,
        hash: &hash,
        phone: req.phone,
        salt: &salt,
    })?;

    db.with_conn(|conn| profile.insert(conn))?;
    info!(profile_id = %profile.id(), "Profile created");
    Ok(profile)
}

/// The profile registered under `email`, if `password` matches its hash.
pub fn login(db: &Database, email: &str, password: &str) -> Result<Profile> {
    let profile = db.with_conn(|conn| get_profile_by_email(conn, email))?;
    match profile {
        Some(profile) if verify_password(password, profile.salt(), profile.hash()) => {
            info!(profile_id = %profile.id(), "Password verified");
            Ok(profile)
        }
        _ => bail!("email or password did not match"),
    }
}

pub fn add_article(db: &mut Database, author: &str, content: &str) -> Result<Article> {
    let article = Article::new(Uuid::new_v4(), author, content, DateInput::Now)?;

    let inserted = db.transaction(|tx| {
        if get_profile_by_profile_id(tx, article.author_profile_id())?.is_none() {
            return Ok(false);
        }
        article.insert(tx)?;
        Ok(true)
    })?;
    if !inserted {
        bail!("no profile with id {}", article.author_profile_id());
    }

    info!(article_id = %article.id(), "Article published");
    Ok(article)
}

pub fn add_clap(db: &mut Database, article_id: &str, profile_id: &str) -> Result<Clap> {
    let clap = Clap::new(article_id, profile_id, DateInput::Now)?;

    let missing = db.transaction(|tx| {
        if get_article_by_article_id(tx, clap.article_id())?.is_none() {
            return Ok(Some(("article", clap.article_id())));
        }
        if get_profile_by_profile_id(tx, clap.profile_id())?.is_none() {
            return Ok(Some(("profile", clap.profile_id())));
        }
        clap.insert(tx)?;
        Ok(None)
    })?;
    if let Some((table, id)) = missing {
        bail!("no {} with id {}", table, id);
    }

    info!(article_id = %clap.article_id(), profile_id = %clap.profile_id(), "Clap recorded");
    Ok(clap)
}

/// Every article with its author (credentials omitted) and claps.
pub fn export(db: &Database) -> Result<Value> {
    let entries = db.with_conn(|conn| {
        let articles = get_all_articles(conn)?;
        let mut entries = Vec::with_capacity(articles.len());
        for article in articles {
            let author = get_profile_by_profile_id(conn, article.author_profile_id())?;
            let claps = get_claps_by_article_id(conn, article.id())?;
            entries.push(json!({
                "article": article,
                "author": author,
                "claps": claps,
            }));
        }
        Ok::<_, DbError>(entries)
    })?;

    Ok(Value::Array(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ken() -> NewProfile<'static> {
        NewProfile {
            full_name: "Kenneth Keyes",
            caption: "hobbyist writer",
            email: "ken@example.com",
            phone: None,
            password: "correct horse battery staple",
        }
    }

    #[test]
    fn add_profile_stores_a_verifiable_hash() {
        let db = Database::open_in_memory().unwrap();
        let profile = add_profile(&db, ken()).unwrap();

        let stored = db
            .with_conn(|conn| get_profile_by_profile_id(conn, profile.id()))
            .unwrap()
            .unwrap();
        assert!(verify_password(
            "correct horse battery staple",
            stored.salt(),
            stored.hash()
        ));
        assert_eq!(stored.activation_token().map(str::len), Some(32));
    }

    #[test]
    fn login_checks_email_and_password() {
        let db = Database::open_in_memory().unwrap();
        let profile = add_profile(&db, ken()).unwrap();

        let found = login(&db, "ken@example.com", "correct horse battery staple").unwrap();
        assert_eq!(found.id(), profile.id());

        let err = login(&db, "ken@example.com", "battery staple").unwrap_err();
        assert_eq!(err.to_string(), "email or password did not match");
        assert!(login(&db, "dylan@example.com", "correct horse battery staple").is_err());
    }

    #[test]
    fn add_article_requires_a_known_author() {
        let mut db = Database::open_in_memory().unwrap();
        let err = add_article(&mut db, &Uuid::new_v4().to_string(), "About Me").unwrap_err();
        assert!(err.to_string().starts_with("no profile with id"));

        assert!(add_article(&mut db, "not-a-uuid", "About Me").is_err());
    }

    #[test]
    fn add_clap_requires_known_keys() {
        let mut db = Database::open_in_memory().unwrap();
        let profile = add_profile(&db, ken()).unwrap();

        let err = add_clap(&mut db, &Uuid::new_v4().to_string(), &profile.id().to_string())
            .unwrap_err();
        assert!(err.to_string().starts_with("no article with id"));
    }

    #[test]
    fn export_nests_authors_and_claps() {
        let mut db = Database::open_in_memory().unwrap();
        assert_eq!(export(&db).unwrap(), json!([]));

        let profile = add_profile(&db, ken()).unwrap();
        let profile_id = profile.id().to_string();
        let article = add_article(&mut db, &profile_id, "About Me").unwrap();
        add_clap(&mut db, &article.id().to_string(), &profile_id).unwrap();

        let export = export(&db).unwrap();
        let entry = &export[0];
        assert_eq!(entry["article"]["articleContent"], "About Me");
        assert_eq!(entry["author"]["profileFullName"], "Kenneth Keyes");
        assert!(entry["author"].get("profileHash").is_none());
        assert_eq!(entry["claps"][0]["clapProfileId"], profile_id);
        assert_eq!(export.as_array().unwrap().len(), 1);
    }
}
