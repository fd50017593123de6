use thiserror::Error;

/// Errors raised while talking to the org metadata backend.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not open a session for '{alias}': {message}")]
    Session { alias: String, message: String },
    #[error("unexpected metadata response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for metadata lookups.
pub type Result<T> = std::result::Result<T, MetadataError>;
