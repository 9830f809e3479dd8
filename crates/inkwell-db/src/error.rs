use inkwell_types::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A finder argument was rejected before the store was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored row no longer satisfies the entity's field rules.
    #[error("{table} row failed validation: {source}")]
    CorruptRow {
        table: &'static str,
        #[source]
        source: ValidationError,
    },

    /// The connection rejected the statement.
    #[error("store operation failed: {0}")]
    Store(#[from] rusqlite::Error),
}

impl DbError {
    pub fn corrupt_row(table: &'static str) -> impl FnOnce(ValidationError) -> Self {
        move |source| Self::CorruptRow { table, source }
    }

    /// True when the store refused the write because of a key, unique or
    /// foreign-key constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Store(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
