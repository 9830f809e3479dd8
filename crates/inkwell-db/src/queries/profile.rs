use rusqlite::{Connection, OptionalExtension, Params, Statement, params};
use tracing::debug;

use inkwell_types::profile::EMAIL_MAX;
use inkwell_types::validate::{
    UuidInput, is_hex, normalize_hex, sanitize_text, validate_email, validate_uuid,
};
use inkwell_types::{Profile, ValidationError};

use super::{Persist, glob_contains};
use crate::error::DbError;
use crate::models::ProfileRow;

pub(crate) const SELECT_PROFILE: &str = "SELECT profileId, profileActivationToken, profileFullName, profileCaption, profileEmail, profileHash, profilePhone, profileSalt FROM profile";

impl Persist for Profile {
    fn insert(&self, conn: &Connection) -> Result<(), DbError> {
        let id = self.id();
        conn.execute(
            "INSERT INTO profile (profileId, profileActivationToken, profileFullName, profileCaption, profileEmail, profileHash, profilePhone, profileSalt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.as_bytes().as_slice(),
                self.activation_token(),
                self.full_name(),
                self.caption(),
                self.email(),
                self.hash(),
                self.phone(),
                self.salt(),
            ],
        )?;

        debug!(profile_id = %id, "profile inserted");
        Ok(())
    }

    fn update(&self, conn: &Connection) -> Result<(), DbError> {
        let id = self.id();
        let rows = conn.execute(
            "UPDATE profile
             SET profileActivationToken = ?2, profileFullName = ?3, profileCaption = ?4,
                 profileEmail = ?5, profileHash = ?6, profilePhone = ?7, profileSalt = ?8
             WHERE profileId = ?1",
            params![
                id.as_bytes().as_slice(),
                self.activation_token(),
                self.full_name(),
                self.caption(),
                self.email(),
                self.hash(),
                self.phone(),
                self.salt(),
            ],
        )?;

        debug!(profile_id = %id, rows, "profile updated");
        Ok(())
    }

    fn delete(&self, conn: &Connection) -> Result<(), DbError> {
        let id = self.id();
        let rows = conn.execute(
            "DELETE FROM profile WHERE profileId = ?1",
            params![id.as_bytes().as_slice()],
        )?;

        debug!(profile_id = %id, rows, "profile deleted");
        Ok(())
    }
}

pub fn get_profile_by_profile_id<'a>(
    conn: &Connection,
    profile_id: impl Into<UuidInput<'a>>,
) -> Result<Option<Profile>, DbError> {
    let profile_id = validate_uuid("profileId", profile_id)?;

    let mut stmt = conn.prepare(&format!("{SELECT_PROFILE} WHERE profileId = ?1"))?;
    let row = stmt
        .query_row(params![profile_id.as_bytes().as_slice()], ProfileRow::from_row)
        .optional()?;

    row.map(ProfileRow::into_profile).transpose()
}

pub fn get_profile_by_email(conn: &Connection, email: &str) -> Result<Option<Profile>, DbError> {
    let email = validate_email("profileEmail", email, EMAIL_MAX)?;

    let mut stmt = conn.prepare(&format!("{SELECT_PROFILE} WHERE profileEmail = ?1"))?;
    let row = stmt
        .query_row(params![email], ProfileRow::from_row)
        .optional()?;

    row.map(ProfileRow::into_profile).transpose()
}

pub fn get_profile_by_activation_token(
    conn: &Connection,
    token: &str,
) -> Result<Option<Profile>, DbError> {
    let token = normalize_hex(token);
    if !is_hex(&token) {
        return Err(ValidationError::invalid(
            "profileActivationToken",
            "empty or not hexadecimal",
        )
        .into());
    }

    let mut stmt = conn.prepare(&format!("{SELECT_PROFILE} WHERE profileActivationToken = ?1"))?;
    let row = stmt
        .query_row(params![token], ProfileRow::from_row)
        .optional()?;

    row.map(ProfileRow::into_profile).transpose()
}

/// Profiles whose full name contains `full_name`, case-sensitively, in
/// insertion order.
pub fn get_profiles_by_full_name(
    conn: &Connection,
    full_name: &str,
) -> Result<Vec<Profile>, DbError> {
    let full_name = sanitize_text(full_name);
    if full_name.is_empty() {
        return Err(ValidationError::invalid("profileFullName", "empty or insecure").into());
    }

    let mut stmt = conn.prepare(&format!(
        "{SELECT_PROFILE} WHERE profileFullName GLOB ?1 ORDER BY rowid"
    ))?;
    collect_profiles(&mut stmt, params![glob_contains(&full_name)])
}

fn collect_profiles(stmt: &mut Statement<'_>, params: impl Params) -> Result<Vec<Profile>, DbError> {
    let rows = stmt
        .query_map(params, ProfileRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(ProfileRow::into_profile).collect()
}
