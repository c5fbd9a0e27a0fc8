//! IMAP connection management.
//!
//! This module provides connection handling for IMAP servers, including:
//! - Configuration (host, port, security mode)
//! - TLS/plaintext stream abstraction
//! - Framed I/O for IMAP protocol
//! - Type-state connection wrapper

mod client;
mod config;
mod framed;
mod stream;

pub use client::{Authenticated, Client, LoggedIn, MailboxStatus, NotAuthenticated, Selected};
pub use config::{Config, Security};
pub use framed::{FramedStream, parse_literal_length};
pub use stream::{ImapStream, connect, connect_plain, connect_tls};
