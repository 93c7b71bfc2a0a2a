//! Error taxonomy for hypermedia navigation.
//!
//! Every fallible operation in this crate returns [`Error`]. Navigation stops
//! at the first failing step, and the variant tells the caller *why*: a
//! missing relationship, a network failure, or a response the client could
//! not understand.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by links, representors, resources and the client.
#[derive(Debug, Error)]
pub enum Error {
    /// The client was constructed with unusable settings (e.g. an empty bookmark).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A context URI, href, relative reference or URI template could not be parsed.
    #[error("malformed URI {input:?}: {reason}")]
    MalformedUri { input: String, reason: String },

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No representor is registered for the response's content type.
    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    /// The response carried no `Content-Type` header.
    #[error("response has no content-type header")]
    MissingContentType,

    /// A link object in the body is unusable (missing `href`, wrong field types).
    #[error("invalid link for rel {rel:?}: {reason}")]
    InvalidLink { rel: String, reason: String },

    /// The representation has no link with the requested relationship.
    #[error("no link with rel {0:?}")]
    LinkNotFound(String),

    /// The body could not be decoded as the declared format.
    #[error("unsupported body: {0}")]
    UnsupportedBody(String),
}

impl Error {
    pub(crate) fn malformed_uri(input: impl Into<String>, reason: impl ToString) -> Self {
        Error::MalformedUri {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_link(rel: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidLink {
            rel: rel.into(),
            reason: reason.into(),
        }
    }
}

/// Shorthand used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
