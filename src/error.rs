use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Vault not detected: VAULT_ADDR not set")]
    VaultNotDetected,

    #[error("invalid argument {token:?}: expected key=value, \"-\", or \"@file\"")]
    InvalidArgument { token: String },

    #[error("stdin already consumed: \"-\" may appear at most once")]
    MultipleStdinConsumption,

    #[error("failed to parse structured data: {0}")]
    MalformedStructuredData(String),

    #[error("failed to convert value for key {key:?} to a string")]
    TypeCoercion { key: String },

    #[error("{method}: method not supported")]
    UnsupportedMethod { method: String },

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("authentication failed: {message}\n\n{help}")]
    AuthenticationFailed { message: String, help: String },

    #[error("no token was returned by the authentication backend")]
    NoTokenReturned,

    #[error(
        "authentication was successful, but the token was not persisted: {0}\n\
         the resulting token is shown above for your records"
    )]
    PersistenceFailed(String),

    #[error("Vault client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Vault request error: {0}")]
    Request(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
