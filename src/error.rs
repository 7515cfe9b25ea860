// Error types module

/// Centralized error type for URL encoding and signing
///
/// Every variant is a configuration error: encoding and signing are pure
/// functions of their inputs, so nothing here is transient or worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum FlyyerError {
    /// A signing strategy was configured without a secret
    #[error("Got `strategy` but missing `secret`. You can find it in your project in Advanced settings.")]
    MissingSecret,

    /// A secret was configured without a signing strategy
    #[error("Got `secret` but missing `strategy`. Valid options are `HMAC` or `JWT`.")]
    MissingStrategy,

    /// The strategy name is neither HMAC nor JWT
    #[error("Invalid signing `strategy` '{0}'. Valid options are `HMAC` or `JWT`.")]
    UnknownStrategy(String),

    /// A routing identifier needed to build the URL is absent
    #[error("Missing \"{0}\" property")]
    MissingRequiredField(&'static str),

    /// The token could not be encoded
    #[error("Failed to encode token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Configuration file errors (unreadable file, missing env vars, invalid YAML)
    #[error("Configuration error: {0}")]
    Config(String),
}
