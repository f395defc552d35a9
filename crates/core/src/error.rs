/// Errors returned by a [`DocumentStore`](crate::store::DocumentStore).
///
/// Backend failures are passed through untouched so callers can surface the driver's message.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("document already exists")]
    Conflict,
    #[error("failed to decode document: {0}")]
    Decode(String),
    #[error("failed to encode document: {0}")]
    Encode(String),
    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<mongodb::bson::de::Error> for StoreError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Encode(err.to_string())
    }
}

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("failed to parse MongoDB connection options: {0}")]
    MongoOptions(mongodb::error::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
