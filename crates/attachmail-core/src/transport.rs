//! Mail session capabilities used by the mailer.
//!
//! The mailer never opens sockets itself. It asks a [`Connector`] for a
//! session, uses it once, and closes it. [`crate::NetworkConnector`] is the
//! real implementation; tests substitute a recording fake.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::Result;

/// Where and how to submit over SMTP.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpParams {
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Where and how to save drafts over IMAP.
#[derive(Clone, PartialEq, Eq)]
pub struct DraftParams {
    /// IMAP server, `host` or `host:port`.
    pub server: String,
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Folder to select and append to.
    pub folder: String,
}

impl std::fmt::Debug for SmtpParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for DraftParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftParams")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}

/// Opens authenticated mail sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects, upgrades with STARTTLS, and authenticates.
    async fn open_smtp(&self, params: &SmtpParams) -> Result<Box<dyn SmtpSession>>;

    /// Connects over TLS, logs in, and selects the draft folder.
    async fn open_draft(&self, params: &DraftParams) -> Result<Box<dyn DraftSession>>;
}

/// An authenticated SMTP session.
#[async_trait]
pub trait SmtpSession: Send {
    /// Submits one message.
    async fn send(&mut self, from: &str, recipients: &[String], message: &[u8]) -> Result<()>;

    /// Ends the session (QUIT).
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A logged-in IMAP session with the draft folder selected.
#[async_trait]
pub trait DraftSession: Send {
    /// Appends one message to `folder`.
    async fn append(
        &mut self,
        folder: &str,
        flags: &[&str],
        date: DateTime<FixedOffset>,
        message: &[u8],
    ) -> Result<()>;

    /// Ends the session (LOGOUT).
    async fn close(self: Box<Self>) -> Result<()>;
}
