//! # attachmail-smtp
//!
//! An async SMTP submission client (RFC 5321) used by the attachment mailer
//! for normal, non-draft delivery.
//!
//! ## Features
//!
//! - **Type-state client**: a session must authenticate before it can submit
//! - **STARTTLS** upgrade over rustls with the webpki root store
//! - **Authentication**: PLAIN, with LOGIN as a fallback for older servers
//! - **DATA encoding**: CRLF normalization and dot-stuffing
//!
//! ## Quick Start
//!
//! ```ignore
//! use attachmail_smtp::{Address, Client};
//! use attachmail_smtp::connection::connect;
//!
//! #[tokio::main]
//! async fn main() -> attachmail_smtp::Result<()> {
//!     let stream = connect("smtp.example.com", 587).await?;
//!     let client = Client::from_stream(stream).await?;
//!     let client = client.ehlo("localhost").await?;
//!     let client = client.starttls("smtp.example.com", "localhost").await?;
//!     let mut client = client.login("user@example.com", "password").await?;
//!
//!     let from = Address::new("user@example.com")?;
//!     let to = Address::new("friend@example.org")?;
//!     client
//!         .send_mail(&from, &[to], b"Subject: Hi\r\n\r\nHello!\r\n")
//!         .await?;
//!
//!     client.quit().await
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! Connected ── ehlo() / starttls() ──┐
//!     │                              │
//!     └──────── login() ─────────────┴──→ Authenticated ── send_mail() ──→ quit()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{Authenticated, Client, Connected, ServerInfo, SmtpStream};
pub use error::{Error, Result};
pub use types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
