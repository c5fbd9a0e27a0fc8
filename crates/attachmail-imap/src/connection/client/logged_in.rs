//! Mailbox commands shared by the authenticated and selected states.

use chrono::{DateTime, FixedOffset};
use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{LoggedIn, MailboxStatus, Selected};
use crate::command::Command;
use crate::response::{Response, Status};
use crate::{Error, Result};

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
    State: LoggedIn,
{
    /// Selects a mailbox.
    pub async fn select(mut self, mailbox: &str) -> Result<(Client<S, Selected>, MailboxStatus)> {
        let tag = self
            .send(&Command::Select {
                mailbox: mailbox.to_string(),
            })
            .await?;
        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;

        let mut status = MailboxStatus::default();
        for response in &responses {
            if let Some(exists) = response.exists() {
                status.exists = exists;
            }
            if response
                .code()
                .is_some_and(|code| code.eq_ignore_ascii_case("READ-ONLY"))
            {
                status.read_only = true;
            }
        }

        Ok((self.transition(), status))
    }

    /// Appends a message to a mailbox.
    ///
    /// Sends the command with a synchronizing literal, waits for the
    /// server's continuation, then sends the message bytes.
    pub async fn append(
        &mut self,
        mailbox: &str,
        flags: &[&str],
        date: Option<DateTime<FixedOffset>>,
        message: &[u8],
    ) -> Result<()> {
        let tag = self
            .send(&Command::Append {
                mailbox: mailbox.to_string(),
                flags: flags.iter().map(|f| (*f).to_string()).collect(),
                date,
                size: message.len(),
            })
            .await?;

        let raw = self.stream.read_response().await?;
        match Response::parse(&raw)? {
            Response::Continuation { .. } => {}
            Response::Tagged { status, text, .. } => {
                return Err(match status {
                    Status::No => Error::No(text),
                    Status::Bad => Error::Bad(text),
                    _ => Error::Protocol("APPEND completed without literal".to_string()),
                });
            }
            Response::Untagged { text, .. } => {
                return Err(Error::Protocol(format!(
                    "expected continuation for APPEND, got: {text}"
                )));
            }
        }

        self.stream.write_all(message).await?;
        self.stream.write_all(b"\r\n").await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)
    }
}
