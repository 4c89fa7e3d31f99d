//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`PlatformError`](crate::platform::PlatformError),
//! [`EnrichmentError`](crate::enrichment::EnrichmentError),
//! [`ConfigError`](crate::config::ConfigError)), while the CLI uses
//! `anyhow` for convenient error propagation.
//!
//! External-service failures inside a sync run never reach this type: they
//! are degraded where they happen. Only validation and storage failures are
//! surfaced to the caller.
//!
//! # Example
//!
//! ```ignore
//! use family_shelf::error::{Error, Result};
//!
//! async fn link(conn: &mut SqliteConnection, raw: &str) -> Result<()> {
//!     let steam_id = SteamId::parse(raw)?;         // Validation errors
//!     accounts::get_by_steam_id(conn, &steam_id).await?; // Database errors
//!     Ok(())
//! }
//! ```

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Input rejected before any work was attempted
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Lookup of a local record failed
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Gaming platform error surfaced outside a sync run
    #[error("Platform error: {0}")]
    Platform(#[from] crate::platform::PlatformError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is a validation failure.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}
