//! Type-state IMAP client connection.
//!
//! The connection states are:
//!
//! - `NotAuthenticated`: after the greeting
//! - `Authenticated`: after a successful LOGIN
//! - `Selected`: after a successful SELECT
//!
//! Each state only exposes the commands valid for it.

#![allow(clippy::missing_errors_doc)]

mod logged_in;
mod not_authenticated;
mod states;

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

pub use self::states::{Authenticated, LoggedIn, MailboxStatus, NotAuthenticated, Selected};
use super::framed::FramedStream;
use crate::command::{Command, TagGenerator};
use crate::response::{Response, Status};
use crate::{Error, Result};

/// IMAP client connection with type-state.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tag_gen: TagGenerator,
    pub(crate) capabilities: Vec<String>,
    _state: PhantomData<State>,
}

impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Moves the connection into another state.
    pub(crate) fn transition<Next>(self) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            _state: PhantomData,
        }
    }

    /// Returns the server capabilities seen so far.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Checks for a capability, ignoring case.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Sends a NOOP command.
    pub async fn noop(&mut self) -> Result<()> {
        let tag = self.send(&Command::Noop).await?;
        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)
    }

    /// Sends LOGOUT and consumes the connection.
    ///
    /// The server may close the connection right after BYE, so only write
    /// failures are reported.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.send(&Command::Logout).await?;
        if let Err(e) = self.read_until_tagged(&tag).await {
            debug!(error = %e, "connection ended during LOGOUT");
        }
        Ok(())
    }

    /// Serializes and sends a command, returning its tag.
    pub(crate) async fn send(&mut self, command: &Command) -> Result<String> {
        let tag = self.tag_gen.next_tag();
        debug!(command = %command.redacted(&tag), "IMAP >");
        self.stream.write_all(&command.serialize(&tag)).await?;
        Ok(tag)
    }

    /// Reads responses until the tagged completion for `tag`.
    pub(crate) async fn read_until_tagged(&mut self, tag: &str) -> Result<Vec<Response>> {
        let mut responses = Vec::new();
        let mut bye = None;
        loop {
            let raw = match self.stream.read_response().await {
                Ok(raw) => raw,
                Err(e) => return Err(bye.map_or(e, Error::Bye)),
            };
            let response = Response::parse(&raw)?;
            debug!(response = %String::from_utf8_lossy(&raw).trim_end(), "IMAP <");

            match &response {
                Response::Tagged { tag: t, .. } if t == tag => {
                    responses.push(response);
                    return Ok(responses);
                }
                Response::Untagged {
                    status: Some(Status::Bye),
                    text,
                    ..
                } => bye = Some(text.clone()),
                _ => {}
            }
            responses.push(response);
        }
    }

    /// Maps the tagged completion in `responses` to a result.
    pub(crate) fn check_tagged_ok(responses: &[Response], tag: &str) -> Result<()> {
        for response in responses.iter().rev() {
            if let Response::Tagged {
                tag: t,
                status,
                text,
                ..
            } = response
                && t == tag
            {
                return match status {
                    Status::Ok | Status::PreAuth => Ok(()),
                    Status::No => Err(Error::No(text.clone())),
                    Status::Bad => Err(Error::Bad(text.clone())),
                    Status::Bye => Err(Error::Bye(text.clone())),
                };
            }
        }
        Err(Error::Protocol("missing tagged response".to_string()))
    }

    /// Replaces stored capabilities with any announced in `responses`.
    pub(crate) fn absorb_capabilities(&mut self, responses: &[Response]) {
        if let Some(caps) = responses.iter().find_map(Response::capabilities) {
            self.capabilities = caps;
        }
    }
}
