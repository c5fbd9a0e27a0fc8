//! # attachmail-imap
//!
//! A small async IMAP client (RFC 3501 / RFC 9051) covering what draft
//! delivery needs: log in, select a mailbox, APPEND a message with an
//! internal date, and log out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use attachmail_imap::{Client, Config};
//! use attachmail_imap::connection::connect;
//!
//! #[tokio::main]
//! async fn main() -> attachmail_imap::Result<()> {
//!     let config = Config::from_server("imap.example.com")?;
//!     let stream = connect(&config).await?;
//!     let client = Client::from_stream(stream).await?;
//!     let client = client.login("user@example.com", "password").await?;
//!     let (mut client, status) = client.select("Drafts").await?;
//!     println!("{} messages", status.exists);
//!
//!     let now = chrono::Local::now().fixed_offset();
//!     client.append("Drafts", &[], Some(now), b"Subject: hi\r\n\r\nbody\r\n").await?;
//!     client.logout().await
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! NotAuthenticated ── login() ──→ Authenticated ── select() ──→ Selected
//!                                      │                           │
//!                                      └──── append() / logout() ──┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
pub mod date;
mod error;
pub mod response;

pub use command::{Command, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, FramedStream, ImapStream, LoggedIn, MailboxStatus,
    NotAuthenticated, Security, Selected,
};
pub use error::{Error, Result};
pub use response::{Response, Status};
