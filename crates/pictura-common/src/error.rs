//! Common error types used throughout pictura.
//!
//! The database layer reports its failures through [`Error`]; application
//! code wraps them with `anyhow` context.

/// Common error type for pictura.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::database("connection failed");
        assert_eq!(err.to_string(), "Database error: connection failed");

        let err = Error::invalid_input("empty file name");
        assert_eq!(err.to_string(), "Invalid input: empty file name");
    }

    #[test]
    fn test_error_string_into() {
        let err = Error::database(String::from("locked"));
        assert!(matches!(err, Error::Database(ref msg) if msg == "locked"));
    }
}
