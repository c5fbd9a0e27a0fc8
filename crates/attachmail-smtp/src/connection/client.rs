//! Type-state SMTP client.

use super::{ServerInfo, SmtpStream};
use crate::command::{Command, encode_data};
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::marker::PhantomData;
use tracing::debug;

/// Type-state marker: greeted, not yet authenticated.
#[derive(Debug)]
pub struct Connected;

/// Type-state marker: authenticated and ready to submit.
#[derive(Debug)]
pub struct Authenticated;

/// SMTP client with type-state pattern.
#[derive(Debug)]
pub struct Client<State> {
    stream: SmtpStream,
    server_info: ServerInfo,
    _state: PhantomData<State>,
}

impl Client<Connected> {
    /// Creates a client from a stream and reads the 220 greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting cannot be read or is not 2xx.
    pub async fn from_stream(mut stream: SmtpStream) -> Result<Self> {
        let greeting = read_reply(&mut stream).await?;
        ensure_success(&greeting)?;

        let hostname = greeting
            .lines
            .first()
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();
        debug!(%hostname, "SMTP greeting received");

        Ok(Self {
            stream,
            server_info: ServerInfo {
                hostname,
                extensions: Vec::new(),
            },
            _state: PhantomData,
        })
    }

    /// Sends EHLO and records the advertised extensions.
    ///
    /// A server that rejects EHLO with a 5xx reply is greeted with HELO
    /// instead, leaving the extension list empty.
    ///
    /// # Errors
    ///
    /// Returns an error if both greetings fail.
    pub async fn ehlo(mut self, client_hostname: &str) -> Result<Self> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?;

        if reply.code.is_permanent() {
            debug!(code = %reply.code, "EHLO refused, falling back to HELO");
            let reply = self
                .send_command(Command::Helo {
                    hostname: client_hostname.to_string(),
                })
                .await?;
            if let Err(e) = ensure_success(&reply) {
                return Err(self.abort(e).await);
            }
            self.server_info.extensions.clear();
            return Ok(self);
        }

        if let Err(e) = ensure_success(&reply) {
            return Err(self.abort(e).await);
        }
        self.server_info.extensions = reply.lines.iter().skip(1).map(|l| Extension::parse(l)).collect();
        Ok(self)
    }

    /// Upgrades the connection with STARTTLS and greets the server again.
    ///
    /// `tls_hostname` is verified against the server certificate;
    /// `client_hostname` is sent in the second EHLO.
    ///
    /// # Errors
    ///
    /// Returns an error if STARTTLS is not advertised or the upgrade fails.
    pub async fn starttls(mut self, tls_hostname: &str, client_hostname: &str) -> Result<Self> {
        if !self.server_info.supports_starttls() {
            return Err(self.abort(Error::NotSupported("STARTTLS".into())).await);
        }

        let reply = self.send_command(Command::StartTls).await?;
        if let Err(e) = ensure_success(&reply) {
            return Err(self.abort(e).await);
        }

        self.stream = self.stream.upgrade_to_tls(tls_hostname).await?;
        debug!(host = tls_hostname, "SMTP session upgraded to TLS");

        // Capabilities learned before the upgrade must be discarded (RFC 3207).
        self.server_info.extensions.clear();
        self.ehlo(client_hostname).await
    }

    /// Authenticates with the server's preferred plaintext mechanism.
    ///
    /// PLAIN is used when advertised (or when the server lists no
    /// mechanisms); otherwise LOGIN. A refused step ends the session
    /// with QUIT before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if neither mechanism is offered or the server
    /// rejects the credentials.
    pub async fn login(mut self, username: &str, password: &str) -> Result<Client<Authenticated>> {
        let offered = self.server_info.auth_mechanisms();
        let mechanism = if offered.is_empty() || offered.contains(&AuthMechanism::Plain) {
            AuthMechanism::Plain
        } else if offered.contains(&AuthMechanism::Login) {
            AuthMechanism::Login
        } else {
            return Err(self
                .abort(Error::NotSupported("AUTH PLAIN or LOGIN".into()))
                .await);
        };

        let reply = match mechanism {
            AuthMechanism::Login => self.auth_login(username, password).await?,
            _ => {
                let credentials = STANDARD.encode(format!("\0{username}\0{password}"));
                self.send_command(Command::Auth {
                    mechanism: AuthMechanism::Plain,
                    initial_response: Some(credentials),
                })
                .await?
            }
        };
        if let Err(e) = ensure_success(&reply) {
            return Err(self.abort(e).await);
        }
        debug!(mechanism = mechanism.as_str(), "SMTP authentication accepted");

        Ok(Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        })
    }

    async fn auth_login(&mut self, username: &str, password: &str) -> Result<Reply> {
        let challenge = self
            .send_command(Command::Auth {
                mechanism: AuthMechanism::Login,
                initial_response: None,
            })
            .await?;
        if challenge.code != ReplyCode::AUTH_CONTINUE {
            return Ok(challenge);
        }

        let challenge = self
            .send_command(Command::AuthResponse(STANDARD.encode(username)))
            .await?;
        if challenge.code != ReplyCode::AUTH_CONTINUE {
            return Ok(challenge);
        }

        self.send_command(Command::AuthResponse(STANDARD.encode(password)))
            .await
    }
}

impl Client<Authenticated> {
    /// Runs one mail transaction: MAIL FROM, RCPT TO for each recipient,
    /// DATA, and the encoded message.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no recipients, the message exceeds the
    /// advertised SIZE, or the server rejects any step.
    pub async fn send_mail(
        &mut self,
        from: &Address,
        recipients: &[Address],
        message: &[u8],
    ) -> Result<()> {
        if recipients.is_empty() {
            return Err(Error::InvalidAddress("no recipients".into()));
        }
        if let Some(limit) = self.server_info.max_message_size()
            && message.len() > limit
        {
            return Err(Error::MessageTooLarge {
                size: message.len(),
                limit,
            });
        }

        let size = self.server_info.supports_size().then_some(message.len());
        let reply = self
            .send_command(Command::MailFrom {
                from: from.clone(),
                size,
            })
            .await?;
        ensure_success(&reply)?;

        for to in recipients {
            let reply = self.send_command(Command::RcptTo { to: to.clone() }).await?;
            ensure_success(&reply)?;
        }

        let reply = self.send_command(Command::Data).await?;
        if reply.code != ReplyCode::START_DATA {
            return Err(Error::smtp(reply.code.as_u16(), reply.text()));
        }

        self.stream.write_all(&encode_data(message)).await?;
        let reply = read_reply(&mut self.stream).await?;
        ensure_success(&reply)?;
        debug!(bytes = message.len(), recipients = recipients.len(), "message accepted");
        Ok(())
    }
}

impl<S> Client<S> {
    /// Returns what the server told us about itself.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Returns true if the session is running over TLS.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        self.stream.is_tls()
    }

    /// Sends QUIT and closes the connection (available in any state).
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT exchange fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(Command::Quit).await?;
        if !reply.is_success() && reply.code != ReplyCode::CLOSING {
            return Err(Error::smtp(reply.code.as_u16(), reply.text()));
        }
        Ok(())
    }

    /// Sends QUIT after the server refused a step and hands back `err`.
    async fn abort(self, err: Error) -> Error {
        if let Err(quit) = self.quit().await {
            debug!(error = %quit, "QUIT failed after refused command");
        }
        err
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        debug!(command = %cmd.redacted(), "C:");
        self.stream.write_all(&cmd.serialize()).await?;
        read_reply(&mut self.stream).await
    }
}

async fn read_reply(stream: &mut SmtpStream) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = stream.read_line().await?;
        if line.is_empty() {
            continue;
        }
        let last = is_last_reply_line(&line);
        lines.push(line);
        if last {
            break;
        }
    }
    let reply = parse_reply(&lines)?;
    debug!(code = %reply.code, "S:");
    Ok(reply)
}

fn ensure_success(reply: &Reply) -> Result<()> {
    if reply.is_success() {
        Ok(())
    } else {
        Err(Error::smtp(reply.code.as_u16(), reply.text()))
    }
}
