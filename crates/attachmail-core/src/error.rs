//! Error types and the terminal outcome of a mail call.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while resolving, composing, or delivering.
#[derive(Debug, Error)]
pub enum Error {
    /// The sender address is missing or blank.
    #[error("Email Not Sent. Enter a valid Email Address.")]
    MissingAddress,

    /// The sender password is missing or blank.
    #[error("Email Not Sent. Enter a valid Email Password.")]
    MissingPassword,

    /// Any other configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The attachment could not be read.
    #[error("Could not read attachment {}: {source}", path.display())]
    Attachment {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Neither resource root yields a path for the file.
    #[error("Could not resolve a path for attachment '{0}': no resource root is configured")]
    Unresolved(String),

    /// Tool arguments or a configuration file were not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The message could not be built.
    #[error("Message could not be composed: {0}")]
    Mime(#[from] attachmail_mime::Error),

    /// SMTP submission failed.
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] attachmail_smtp::Error),

    /// Saving the draft over IMAP failed.
    #[error("Draft delivery failed: {0}")]
    Imap(#[from] attachmail_imap::Error),

    /// The whole call exceeded its time limit.
    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure category of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blank credentials, bad port, missing host, malformed input.
    Config,
    /// Attachment missing, unreadable, or unresolvable.
    Io,
    /// Connection, TLS, authentication, or server rejection.
    Network,
}

impl Error {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAddress
            | Self::MissingPassword
            | Self::Config(_)
            | Self::Json(_)
            | Self::Mime(_)
            | Self::Smtp(
                attachmail_smtp::Error::InvalidAddress(_)
                | attachmail_smtp::Error::InvalidHostname(_),
            )
            | Self::Imap(
                attachmail_imap::Error::InvalidServer(_)
                | attachmail_imap::Error::InvalidDnsName(_),
            ) => ErrorKind::Config,
            Self::Attachment { .. } | Self::Unresolved(_) => ErrorKind::Io,
            Self::Smtp(_) | Self::Imap(_) | Self::Timeout(_) => ErrorKind::Network,
        }
    }
}

/// Terminal outcome of a mail call.
///
/// Displays as the status string handed back to the host agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailOutcome {
    /// The message was sent or saved; carries the success text.
    Sent(String),
    /// The call failed.
    Failed {
        /// Failure category.
        kind: ErrorKind,
        /// Human-readable reason, without the `Error:` prefix.
        message: String,
    },
}

impl MailOutcome {
    /// Returns true for [`MailOutcome::Sent`].
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }

    /// Returns the failure kind, if the call failed.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Sent(_) => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl From<Error> for MailOutcome {
    fn from(err: Error) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for MailOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent(message) => f.write_str(message),
            Self::Failed { message, .. } => write!(f, "Error: {message}"),
        }
    }
}
