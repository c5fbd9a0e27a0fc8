//! The attachment mailer.
//!
//! One call checks the credentials, resolves the file, composes the
//! message, and delivers it through a [`Connector`]. Nothing is retried.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::compose::{compose, envelope_recipients};
use crate::config::DeliveryConfig;
use crate::request::AttachmentRequest;
use crate::resolve::PathResolver;
use crate::transport::Connector;
use crate::{Error, MailOutcome, Result};

/// Sends or drafts one email per call.
#[derive(Debug)]
pub struct AttachmentMailer<C> {
    config: DeliveryConfig,
    resolver: PathResolver,
    connector: C,
}

impl<C: Connector> AttachmentMailer<C> {
    /// Creates a mailer; the resource roots are resolved against the
    /// current working directory.
    #[must_use]
    pub fn new(config: DeliveryConfig, connector: C) -> Self {
        let resolver = PathResolver::from_config(&config);
        Self::with_resolver(config, resolver, connector)
    }

    /// Creates a mailer with an explicit resolver.
    #[must_use]
    pub const fn with_resolver(config: DeliveryConfig, resolver: PathResolver, connector: C) -> Self {
        Self {
            config,
            resolver,
            connector,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Resolves `request.filename`, then composes and delivers.
    pub async fn execute(&self, request: &AttachmentRequest) -> MailOutcome {
        let outcome = match self.deliver(request, Attachment::Resolve).await {
            Ok(text) => MailOutcome::Sent(text),
            Err(err) => err.into(),
        };
        log_outcome(&outcome);
        outcome
    }

    /// Composes and delivers with an already resolved attachment path.
    /// `None` sends the message without an attachment.
    pub async fn send_with_attachment(
        &self,
        request: &AttachmentRequest,
        attachment: Option<&Path>,
    ) -> MailOutcome {
        let outcome = match self.deliver(request, Attachment::Given(attachment)).await {
            Ok(text) => MailOutcome::Sent(text),
            Err(err) => err.into(),
        };
        log_outcome(&outcome);
        outcome
    }

    async fn deliver(&self, request: &AttachmentRequest, attachment: Attachment<'_>) -> Result<String> {
        self.config.check_credentials()?;

        let resolved: Option<PathBuf> = match attachment {
            Attachment::Resolve => Some(
                self.resolver
                    .resolve(&request.filename)
                    .ok_or_else(|| Error::Unresolved(request.filename.clone()))?,
            ),
            Attachment::Given(path) => path.map(Path::to_path_buf),
        };

        let message = compose(&self.config, request, resolved.as_deref()).await?;
        let bytes = message.to_bytes();

        if self.config.wants_draft(&request.to) {
            self.save_draft(&bytes).await
        } else {
            self.submit(&request.to, &bytes).await
        }
    }

    async fn save_draft(&self, message: &[u8]) -> Result<String> {
        let params = self.config.draft_params()?;
        let mut session = self.connector.open_draft(&params).await?;
        let appended = session
            .append(&params.folder, &[], attachmail_imap::date::now(), message)
            .await;
        let closed = session.close().await;
        appended?;
        if let Err(err) = closed {
            warn!(error = %err, "IMAP logout failed after append");
        }
        Ok(format!("Email went to {}", params.folder))
    }

    async fn submit(&self, to: &str, message: &[u8]) -> Result<String> {
        let params = self.config.smtp_params()?;
        let recipients = envelope_recipients(to);
        if recipients.is_empty() {
            return Err(attachmail_smtp::Error::InvalidAddress(to.to_string()).into());
        }

        let mut session = self.connector.open_smtp(&params).await?;
        let sent = session
            .send(self.config.email_address.trim(), &recipients, message)
            .await;
        let closed = session.close().await;
        sent?;
        if let Err(err) = closed {
            warn!(error = %err, "SMTP QUIT failed after submission");
        }
        Ok(format!("Email was sent to {to}"))
    }
}

#[derive(Clone, Copy)]
enum Attachment<'a> {
    Resolve,
    Given(Option<&'a Path>),
}

fn log_outcome(outcome: &MailOutcome) {
    match outcome {
        MailOutcome::Sent(text) => info!("{text}"),
        MailOutcome::Failed { kind, message } => warn!(?kind, "{message}"),
    }
}
