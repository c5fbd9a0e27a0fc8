//! The network-backed connector.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::debug;

use attachmail_imap::connection::connect as imap_connect;
use attachmail_imap::{ImapStream, Selected};
use attachmail_smtp::connection::connect as smtp_connect;
use attachmail_smtp::{Address, Authenticated};

use crate::Result;
use crate::transport::{Connector, DraftParams, DraftSession, SmtpParams, SmtpSession};

/// Name sent in EHLO when none is configured.
const DEFAULT_CLIENT_HOSTNAME: &str = "localhost";

/// Opens real SMTP (STARTTLS) and IMAP (implicit TLS) sessions.
#[derive(Debug, Clone)]
pub struct NetworkConnector {
    client_hostname: String,
}

impl NetworkConnector {
    /// Creates a connector that greets servers as `localhost`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client_hostname: DEFAULT_CLIENT_HOSTNAME.to_string(),
        }
    }

    /// Sets the name sent in EHLO.
    #[must_use]
    pub fn with_client_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.client_hostname = hostname.into();
        self
    }
}

impl Default for NetworkConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for NetworkConnector {
    async fn open_smtp(&self, params: &SmtpParams) -> Result<Box<dyn SmtpSession>> {
        debug!(host = %params.host, port = params.port, "opening SMTP session");
        let stream = smtp_connect(&params.host, params.port).await?;
        let client = attachmail_smtp::Client::from_stream(stream).await?;
        let client = client.ehlo(&self.client_hostname).await?;
        let client = client
            .starttls(&params.host, &self.client_hostname)
            .await?;
        let client = client.login(&params.username, &params.password).await?;
        Ok(Box::new(NetSmtpSession { client }))
    }

    async fn open_draft(&self, params: &DraftParams) -> Result<Box<dyn DraftSession>> {
        let config = attachmail_imap::Config::from_server(&params.server)?;
        let stream = imap_connect(&config).await?;
        let client = attachmail_imap::Client::from_stream(stream).await?;
        let client = client.login(&params.username, &params.password).await?;
        let (client, status) = client.select(&params.folder).await?;
        debug!(folder = %params.folder, exists = status.exists, "draft folder selected");
        Ok(Box::new(NetDraftSession { client }))
    }
}

struct NetSmtpSession {
    client: attachmail_smtp::Client<Authenticated>,
}

#[async_trait]
impl SmtpSession for NetSmtpSession {
    async fn send(&mut self, from: &str, recipients: &[String], message: &[u8]) -> Result<()> {
        let from = Address::new(from)?;
        let recipients = recipients
            .iter()
            .map(Address::new)
            .collect::<attachmail_smtp::Result<Vec<_>>>()?;
        self.client.send_mail(&from, &recipients, message).await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.client.quit().await?;
        Ok(())
    }
}

struct NetDraftSession {
    client: attachmail_imap::Client<ImapStream, Selected>,
}

#[async_trait]
impl DraftSession for NetDraftSession {
    async fn append(
        &mut self,
        folder: &str,
        flags: &[&str],
        date: DateTime<FixedOffset>,
        message: &[u8],
    ) -> Result<()> {
        self.client.append(folder, flags, Some(date), message).await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.client.logout().await?;
        Ok(())
    }
}
