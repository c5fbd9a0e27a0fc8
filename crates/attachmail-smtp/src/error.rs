//! Error types for SMTP operations.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error, including TLS handshake failures surfaced by the connector.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Server answered with a non-success reply.
    #[error("SMTP error {code}: {message}")]
    Smtp {
        /// Reply code (e.g., 535).
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// Malformed or unexpected server response.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Envelope address failed validation.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Hostname cannot be used as a TLS server name.
    #[error("Invalid hostname for TLS: {0}")]
    InvalidHostname(String),

    /// Server does not advertise a required extension.
    #[error("Server does not support {0}")]
    NotSupported(String),

    /// Message is larger than the server's advertised SIZE limit.
    #[error("Message of {size} bytes exceeds server limit of {limit} bytes")]
    MessageTooLarge {
        /// Size of the message being submitted.
        size: usize,
        /// Limit advertised by the server.
        limit: usize,
    },
}

impl Error {
    /// Creates an SMTP error from a reply code and message.
    #[must_use]
    pub fn smtp(code: u16, message: impl Into<String>) -> Self {
        Self::Smtp {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Smtp { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Smtp { code, .. } if *code >= 400 && *code < 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_reply_codes() {
        assert!(Error::smtp(535, "bad credentials").is_permanent());
        assert!(Error::smtp(451, "try later").is_transient());
        assert!(!Error::Protocol("x".into()).is_permanent());
    }

    #[test]
    fn display_includes_code() {
        let err = Error::smtp(550, "mailbox unavailable");
        assert_eq!(err.to_string(), "SMTP error 550: mailbox unavailable");
    }
}
