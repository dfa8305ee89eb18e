use std::fmt;

/// Repository layer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    PoolError(String),
    NotFound(String),
    /// Primary key or unique column already taken
    DuplicateKey(String),
    /// The referenced `user` row does not exist
    ForeignKeyViolation(String),
    DatabaseError(String),
}

impl RepositoryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        RepositoryError::NotFound(what.into())
    }

    pub fn duplicate_key(what: impl Into<String>) -> Self {
        RepositoryError::DuplicateKey(what.into())
    }

    pub fn foreign_key(what: impl Into<String>) -> Self {
        RepositoryError::ForeignKeyViolation(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::PoolError(msg) => write!(f, "Connection pool error: {msg}"),
            RepositoryError::NotFound(msg) => write!(f, "Not found: {msg}"),
            RepositoryError::DuplicateKey(msg) => write!(f, "Duplicate key: {msg}"),
            RepositoryError::ForeignKeyViolation(msg) => {
                write!(f, "Foreign key constraint violation: {msg}")
            }
            RepositoryError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => RepositoryError::NotFound("Record not found".to_string()),
            Error::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => RepositoryError::DuplicateKey(message),
                    DatabaseErrorKind::ForeignKeyViolation => {
                        RepositoryError::ForeignKeyViolation(message)
                    }
                    _ => RepositoryError::DatabaseError(message),
                }
            }
            _ => RepositoryError::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::PoolError(err.to_string())
    }
}
