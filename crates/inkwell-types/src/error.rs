/// Raised synchronously by constructors, setters and finder input checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Malformed, insecure or empty input.
    #[error("invalid {field}: {message}")]
    InvalidArgument { field: &'static str, message: String },

    /// Value present but outside the allowed bounds or of the wrong fixed length.
    #[error("{field} out of range: {message}")]
    Range { field: &'static str, message: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    pub fn range(field: &'static str, message: impl Into<String>) -> Self {
        Self::Range {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidArgument { field, .. } | Self::Range { field, .. } => field,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}
