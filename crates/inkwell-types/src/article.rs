use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::validate::{DateInput, UuidInput, validate_date, validate_text, validate_uuid};

pub const CONTENT_MAX: usize = 140;

/// A piece of authored content, owned by one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    article_id: Uuid,
    article_author_profile_id: Uuid,
    article_content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    article_date: DateTime<Utc>,
}

impl Article {
    /// `date` may be [`DateInput::Now`] for a freshly written article.
    pub fn new<'a, 'b, 'c>(
        article_id: impl Into<UuidInput<'a>>,
        author_profile_id: impl Into<UuidInput<'b>>,
        content: &str,
        date: impl Into<DateInput<'c>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            article_id: validate_uuid("articleId", article_id)?,
            article_author_profile_id: validate_uuid("articleAuthorProfileId", author_profile_id)?,
            article_content: validate_text("articleContent", content, CONTENT_MAX)?,
            article_date: validate_date("articleDate", date)?,
        })
    }

    pub fn id(&self) -> Uuid {
        self.article_id
    }

    pub fn author_profile_id(&self) -> Uuid {
        self.article_author_profile_id
    }

    pub fn set_author_profile_id<'a>(
        &mut self,
        profile_id: impl Into<UuidInput<'a>>,
    ) -> Result<(), ValidationError> {
        self.article_author_profile_id = validate_uuid("articleAuthorProfileId", profile_id)?;
        Ok(())
    }

    pub fn content(&self) -> &str {
        &self.article_content
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), ValidationError> {
        self.article_content = validate_text("articleContent", content, CONTENT_MAX)?;
        Ok(())
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.article_date
    }

    pub fn set_date<'a>(&mut self, date: impl Into<DateInput<'a>>) -> Result<(), ValidationError> {
        self.article_date = validate_date("articleDate", date)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn serializes_ids_as_strings_and_date_as_millis() {
        let id = Uuid::new_v4();
        let author = Uuid::new_v4();
        let date = Utc.with_ymd_and_hms(2017, 10, 5, 8, 30, 0).unwrap();

        let article = Article::new(id, author, "About Me", date).unwrap();
        let json = serde_json::to_value(&article).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "articleId": id.to_string(),
                "articleAuthorProfileId": author.to_string(),
                "articleContent": "About Me",
                "articleDate": date.timestamp_millis(),
            })
        );
    }

    #[test]
    fn content_of_141_characters_is_out_of_range() {
        let content = "a".repeat(141);
        let err = Article::new(Uuid::new_v4(), Uuid::new_v4(), &content, DateInput::Now).unwrap_err();
        assert!(err.is_range());
        assert_eq!(err.field(), "articleContent");

        let content = "a".repeat(140);
        assert!(Article::new(Uuid::new_v4(), Uuid::new_v4(), &content, DateInput::Now).is_ok());
    }

    #[test]
    fn empty_content_is_invalid() {
        let err = Article::new(Uuid::new_v4(), Uuid::new_v4(), " <hr> ", DateInput::Now).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn date_accepts_storage_strings() {
        let mut article =
            Article::new(Uuid::new_v4(), Uuid::new_v4(), "About Me", "2017-10-05 08:30:00.250000")
                .unwrap();
        assert_eq!(article.date().timestamp_subsec_millis(), 250);

        assert!(article.set_date("2017-02-31 00:00:00").unwrap_err().is_range());
        assert!(article.set_date("last tuesday").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn unset_date_defaults_to_now() {
        let before = Utc::now() - chrono::Duration::seconds(1);
        let article = Article::new(Uuid::new_v4(), Uuid::new_v4(), "About Me", DateInput::Now).unwrap();
        assert!(article.date() > before);
    }

    #[test]
    fn author_setter_revalidates() {
        let mut article =
            Article::new(Uuid::new_v4(), Uuid::new_v4(), "About Me", DateInput::Now).unwrap();

        let err = article.set_author_profile_id("bogus").unwrap_err();
        assert_eq!(err.field(), "articleAuthorProfileId");

        let author = Uuid::new_v4();
        article.set_author_profile_id(author.to_string().as_str()).unwrap();
        assert_eq!(article.author_profile_id(), author);
    }
}
