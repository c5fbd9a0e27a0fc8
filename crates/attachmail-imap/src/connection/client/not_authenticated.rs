//! Implementation for the not-authenticated state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::response::{Response, Status};
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a client from a connected stream.
    ///
    /// Reads the server greeting and any capabilities it carries.
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut framed = FramedStream::new(stream);

        let greeting = framed.read_response().await?;
        let response = Response::parse(&greeting)?;
        debug!(greeting = %String::from_utf8_lossy(&greeting).trim_end(), "IMAP <");

        let capabilities = match &response {
            Response::Untagged {
                status: Some(Status::Bye),
                text,
                ..
            } => return Err(Error::Bye(text.clone())),
            Response::Untagged {
                status: Some(Status::Ok | Status::PreAuth),
                ..
            } => response.capabilities().unwrap_or_default(),
            _ => {
                return Err(Error::Protocol(format!(
                    "unexpected greeting: {}",
                    String::from_utf8_lossy(&greeting).trim_end()
                )));
            }
        };

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            capabilities,
            _state: PhantomData,
        })
    }

    /// Authenticates with LOGIN.
    ///
    /// A NO completion is reported as [`Error::Auth`].
    pub async fn login(mut self, username: &str, password: &str) -> Result<Client<S, Authenticated>> {
        if self.has_capability("LOGINDISABLED") {
            return Err(Error::Auth("server has disabled LOGIN".to_string()));
        }

        let tag = self
            .send(&Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        let responses = self.read_until_tagged(&tag).await?;
        self.absorb_capabilities(&responses);

        match Self::check_tagged_ok(&responses, &tag) {
            Ok(()) => Ok(self.transition()),
            Err(Error::No(text)) => Err(Error::Auth(text)),
            Err(e) => Err(e),
        }
    }
}
