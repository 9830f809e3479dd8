use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::validate::{DateInput, UuidInput, validate_date, validate_uuid};

/// One profile endorsing one article. Keyed by the (article, profile) pair,
/// so neither id can change once the clap exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clap {
    clap_article_id: Uuid,
    clap_profile_id: Uuid,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    clap_date: DateTime<Utc>,
}

impl Clap {
    pub fn new<'a, 'b, 'c>(
        article_id: impl Into<UuidInput<'a>>,
        profile_id: impl Into<UuidInput<'b>>,
        date: impl Into<DateInput<'c>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            clap_article_id: validate_uuid("clapArticleId", article_id)?,
            clap_profile_id: validate_uuid("clapProfileId", profile_id)?,
            clap_date: validate_date("clapDate", date)?,
        })
    }

    pub fn article_id(&self) -> Uuid {
        self.clap_article_id
    }

    pub fn profile_id(&self) -> Uuid {
        self.clap_profile_id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.clap_date
    }

    pub fn set_date<'a>(&mut self, date: impl Into<DateInput<'a>>) -> Result<(), ValidationError> {
        self.clap_date = validate_date("clapDate", date)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_form() {
        let article = Uuid::new_v4();
        let profile = Uuid::new_v4();
        let clap = Clap::new(article, profile, "2018-01-15 17:04:11.000123").unwrap();

        let json = serde_json::to_value(&clap).unwrap();
        assert_eq!(json["clapArticleId"], article.to_string());
        assert_eq!(json["clapProfileId"], profile.to_string());
        assert_eq!(json["clapDate"], clap.date().timestamp_millis());
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn rejects_bad_keys() {
        let err = Clap::new("nope", Uuid::new_v4(), DateInput::Now).unwrap_err();
        assert_eq!(err.field(), "clapArticleId");
        assert!(err.is_invalid_argument());

        let err = Clap::new(Uuid::new_v4(), Uuid::nil(), DateInput::Now).unwrap_err();
        assert_eq!(err.field(), "clapProfileId");
        assert!(err.is_range());
    }

    #[test]
    fn date_setter_revalidates() {
        let mut clap = Clap::new(Uuid::new_v4(), Uuid::new_v4(), DateInput::Now).unwrap();
        let before = clap.date();

        assert!(clap.set_date("2019-04-31 10:00:00").unwrap_err().is_range());
        assert_eq!(clap.date(), before);

        clap.set_date("2019-04-30 10:00:00").unwrap();
        assert_eq!(clap.date().to_rfc3339(), "2019-04-30T10:00:00+00:00");
    }
}
