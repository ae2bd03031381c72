use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No credentials found. Provide a key file, or set the \
        CLIENT_ID, CLIENT_SECRET, TENANT_ID and SUBSCRIPTION_ID \
        environment variables"
    )]
    MissingCredentials,

    #[error(
        "Credentials provided by both a key file and the environment; \
        remove one source"
    )]
    AmbiguousCredentials,

    #[error("Credential field missing or empty: {0}")]
    MissingField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
