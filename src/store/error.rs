use std::time::Duration;

/// All errors that a `DataStore` implementation can return.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Uniqueness violation on the registration ticket id.
    #[error("ticket already registered: {0}")]
    DuplicateTicket(String),

    /// The registration already has a survey response.
    #[error("registration {0} already has a survey response")]
    DuplicateResponse(i64),

    #[error("registration not found: {0}")]
    RegistrationNotFound(i64),

    /// The call did not settle within the configured limit.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// A backend-specific error (connection, query, decoding).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
