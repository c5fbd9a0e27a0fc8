//! IMAP client errors.

use thiserror::Error;

/// Failure of an IMAP exchange.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket or TLS failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host cannot be used as a TLS server name.
    #[error("Invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A `host[:port]` server string that does not parse.
    #[error("Invalid server address: {0}")]
    InvalidServer(String),

    /// LOGIN was refused or is disabled.
    #[error("Login refused: {0}")]
    Auth(String),

    /// Tagged NO.
    #[error("Server refused command: {0}")]
    No(String),

    /// Tagged BAD.
    #[error("Server rejected command syntax: {0}")]
    Bad(String),

    /// The server closed the session.
    #[error("Server closed the connection: {0}")]
    Bye(String),

    /// Data the client cannot interpret.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns true if the server answered but refused the request.
    #[must_use]
    pub const fn is_refusal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::No(_) | Self::Bad(_))
    }
}

/// Result alias for IMAP operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals() {
        assert!(Error::No("[TRYCREATE] no such mailbox".into()).is_refusal());
        assert!(Error::Auth("bad password".into()).is_refusal());
        assert!(!Error::Bye("shutting down".into()).is_refusal());
    }
}
