//! MIME errors.

/// Result alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to parse, encode, or build a message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `type/subtype` value that does not parse.
    #[error("Malformed content type: {0}")]
    InvalidContentType(String),

    /// Quoted-printable input that does not decode.
    #[error("Malformed transfer encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 input that does not decode.
    #[error("Malformed base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// The builder lacks a header every message needs.
    #[error("Message has no {0} header")]
    MissingHeader(String),
}
