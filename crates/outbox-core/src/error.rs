//! Error types for outbox storage operations.
//!
//! Callers of the storage layer only ever observe four kinds: `NotFound`,
//! `AuthorizationRequired`, `Internal` and `Cancelled`. The remaining variants
//! are produced by engines, codecs and configuration loading, and are folded
//! into `Internal` by the orchestrator before they reach a caller.

use thiserror::Error;

/// Result type alias for outbox operations.
pub type OutboxResult<T> = Result<T, OutboxError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all outbox operations.
#[derive(Error, Debug)]
pub enum OutboxError {
    /// No container exists for the key.
    #[error("Outbox not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        key: Option<String>,
    },

    /// The persistence engine refused access because the session is invalid.
    #[error("Authorization required: {message}")]
    AuthorizationRequired {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Any other I/O or decode failure, reported after self-heal.
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The caller's cancellation token fired before the operation finished.
    #[error("Operation cancelled")]
    Cancelled,

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Outbox (OBX_xxx)
    OutboxNotFound,
    OutboxCorrupted,
    OutboxWriteFailed,
    OutboxClearFailed,

    // Authorization (AUTH_xxx)
    AuthLoginRequired,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Serialization (SER_xxx)
    SerInvalidFormat,

    // Validation (VAL_xxx)
    ValInvalidInput,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Cancellation
    Cancelled,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OutboxNotFound => "OBX_001",
            ErrorCode::OutboxCorrupted => "OBX_002",
            ErrorCode::OutboxWriteFailed => "OBX_003",
            ErrorCode::OutboxClearFailed => "OBX_004",
            ErrorCode::AuthLoginRequired => "AUTH_001",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::SerInvalidFormat => "SER_001",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::Cancelled => "CAN_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl OutboxError {
    /// Create a not found error for a persistence key.
    pub fn not_found(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::NotFound {
            message: format!("no outbox stored under '{}'", key),
            code: ErrorCode::OutboxNotFound,
            key: Some(key),
        }
    }

    /// Create an authorization required error.
    pub fn authorization_required(message: impl Into<String>) -> Self {
        Self::AuthorizationRequired {
            message: message.into(),
            code: ErrorCode::AuthLoginRequired,
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// No container exists for the key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The session must be re-established before retrying.
    pub fn is_authorization_required(&self) -> bool {
        matches!(self, Self::AuthorizationRequired { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Fold an engine, codec or config failure into the caller-facing taxonomy.
    ///
    /// `NotFound`, `AuthorizationRequired`, `Cancelled` and `Internal` pass
    /// through untouched; everything else becomes `Internal` with `code`,
    /// keeping the original error as its source.
    pub fn into_storage_error(self, code: ErrorCode, context: &str) -> Self {
        match self {
            err @ (Self::NotFound { .. }
            | Self::AuthorizationRequired { .. }
            | Self::Cancelled
            | Self::Internal { .. }) => err,
            other => Self::Internal {
                message: format!("{}: {}", context, other),
                code,
                source: Some(Box::new(other)),
            },
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. } => *code,
            Self::AuthorizationRequired { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Cancelled => ErrorCode::Cancelled,
            Self::Validation(_) => ErrorCode::ValInvalidInput,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Serialization(_) => ErrorCode::SerInvalidFormat,
            Self::Io(_) => ErrorCode::Internal,
        }
    }
}

impl From<rusqlite::Error> for OutboxError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
