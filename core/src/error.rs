//! Error types for the social REST client.
//!
//! # Design
//! `ClientError` is the one recoverable error of the request layer: every
//! transport, buffering or decoding failure is funneled into it with the
//! cause's description as the message and the cause itself kept as `source`.
//! `ApiError` sits one level up, where services interpret status codes and
//! payloads. `NotFound` and `Unauthorized` get dedicated variants because
//! callers branch on them; every other unexpected status lands in
//! `HttpError` with the raw body for debugging.

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure of a request round trip or of reading its response.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ClientError {
    /// An error that carries only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap `cause`, using its description as the message.
    pub fn from_cause<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: cause.to_string(),
            source: Some(Box::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by the transport behind a `SocialHttpClient`.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer violated HTTP, or the request could not be formed.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Basic authentication was requested without a session.
    #[error("basic authentication requested but no credentials are configured")]
    MissingCredentials,
}

/// Errors loading a `ClientContext` from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors returned by the identity and activity services.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404, the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    #[error("authentication required")]
    Unauthorized,

    /// The server returned a status other than the expected one, 401 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The REST resource does not support this operation.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),
}
