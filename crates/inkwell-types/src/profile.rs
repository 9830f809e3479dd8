use serde::Serialize;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::validate::{
    UuidInput, is_hex, normalize_hex, validate_email, validate_optional_text, validate_text,
    validate_uuid,
};

pub const FULL_NAME_MAX: usize = 32;
pub const CAPTION_MAX: usize = 140;
pub const EMAIL_MAX: usize = 128;
pub const PHONE_MAX: usize = 32;
pub const ACTIVATION_TOKEN_LEN: usize = 32;
pub const SALT_LEN: usize = 64;
pub const HASH_LEN: usize = 128;

/// An account. Serializes without its activation token or password
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    profile_id: Uuid,
    #[serde(skip_serializing)]
    profile_activation_token: Option<String>,
    profile_full_name: String,
    profile_caption: String,
    profile_email: String,
    #[serde(skip_serializing)]
    profile_hash: String,
    profile_phone: Option<String>,
    #[serde(skip_serializing)]
    profile_salt: String,
}

/// Raw field values for [`Profile::new`], validated on construction.
#[derive(Debug, Clone, Copy)]
pub struct ProfileFields<'a> {
    pub profile_id: UuidInput<'a>,
    pub activation_token: Option<&'a str>,
    pub full_name: &'a str,
    pub caption: &'a str,
    pub email: &'a str,
    pub hash: &'a str,
    pub phone: Option<&'a str>,
    pub salt: &'a str,
}

impl Profile {
    pub fn new(fields: ProfileFields<'_>) -> Result<Self, ValidationError> {
        Ok(Self {
            profile_id: validate_uuid("profileId", fields.profile_id)?,
            profile_activation_token: check_activation_token(fields.activation_token)?,
            profile_full_name: validate_text("profileFullName", fields.full_name, FULL_NAME_MAX)?,
            profile_caption: validate_text("profileCaption", fields.caption, CAPTION_MAX)?,
            profile_email: validate_email("profileEmail", fields.email, EMAIL_MAX)?,
            profile_hash: check_hash(fields.hash)?,
            profile_phone: validate_optional_text("profilePhone", fields.phone, PHONE_MAX)?,
            profile_salt: check_salt(fields.salt)?,
        })
    }

    pub fn id(&self) -> Uuid {
        self.profile_id
    }

    pub fn activation_token(&self) -> Option<&str> {
        self.profile_activation_token.as_deref()
    }

    pub fn set_activation_token(&mut self, token: Option<&str>) -> Result<(), ValidationError> {
        self.profile_activation_token = check_activation_token(token)?;
        Ok(())
    }

    pub fn full_name(&self) -> &str {
        &self.profile_full_name
    }

    pub fn set_full_name(&mut self, full_name: &str) -> Result<(), ValidationError> {
        self.profile_full_name = validate_text("profileFullName", full_name, FULL_NAME_MAX)?;
        Ok(())
    }

    pub fn caption(&self) -> &str {
        &self.profile_caption
    }

    pub fn set_caption(&mut self, caption: &str) -> Result<(), ValidationError> {
        self.profile_caption = validate_text("profileCaption", caption, CAPTION_MAX)?;
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.profile_email
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), ValidationError> {
        self.profile_email = validate_email("profileEmail", email, EMAIL_MAX)?;
        Ok(())
    }

    pub fn hash(&self) -> &str {
        &self.profile_hash
    }

    pub fn set_hash(&mut self, hash: &str) -> Result<(), ValidationError> {
        self.profile_hash = check_hash(hash)?;
        Ok(())
    }

    pub fn phone(&self) -> Option<&str> {
        self.profile_phone.as_deref()
    }

    pub fn set_phone(&mut self, phone: Option<&str>) -> Result<(), ValidationError> {
        self.profile_phone = validate_optional_text("profilePhone", phone, PHONE_MAX)?;
        Ok(())
    }

    pub fn salt(&self) -> &str {
        &self.profile_salt
    }

    pub fn set_salt(&mut self, salt: &str) -> Result<(), ValidationError> {
        self.profile_salt = check_salt(salt)?;
        Ok(())
    }
}

/// Activation tokens are all-or-nothing: any malformed token is out of range.
pub fn check_activation_token(token: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(token) = token else {
        return Ok(None);
    };

    let token = normalize_hex(token);
    if !is_hex(&token) {
        return Err(ValidationError::range("profileActivationToken", "not hexadecimal"));
    }
    if token.len() != ACTIVATION_TOKEN_LEN {
        return Err(ValidationError::range(
            "profileActivationToken",
            format!("must be exactly {ACTIVATION_TOKEN_LEN} characters"),
        ));
    }

    Ok(Some(token))
}

fn check_hash(hash: &str) -> Result<String, ValidationError> {
    check_fixed_hex("profileHash", hash, HASH_LEN)
}

fn check_salt(salt: &str) -> Result<String, ValidationError> {
    check_fixed_hex("profileSalt", salt, SALT_LEN)
}

fn check_fixed_hex(field: &'static str, raw: &str, len: usize) -> Result<String, ValidationError> {
    let value = normalize_hex(raw);
    if !is_hex(&value) {
        return Err(ValidationError::invalid(field, "empty or not hexadecimal"));
    }
    if value.len() != len {
        return Err(ValidationError::range(
            field,
            format!("must be exactly {len} characters"),
        ));
    }
    Ok(value)
}
