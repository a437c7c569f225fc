//! Common error types and handling for Stakazo

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Stakazo application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicate() {
        assert!(Error::NotFound("campaign X".to_string()).is_not_found());
        assert!(!Error::Validation("bad field".to_string()).is_not_found());
        assert!(!Error::Internal("boom".to_string()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Validation("artist is required".to_string()).to_string(),
            "Validation error: artist is required"
        );
        assert_eq!(
            Error::NotFound("campaign CAMP_X".to_string()).to_string(),
            "Not found: campaign CAMP_X"
        );
    }
}
