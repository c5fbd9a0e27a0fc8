//! IMAP command builders.

mod serialize;
mod tag;

pub use serialize::{encode_mailbox, write_astring};
pub use tag::TagGenerator;

use chrono::{DateTime, FixedOffset};

use crate::date::internal_date;

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// CAPABILITY command.
    Capability,
    /// NOOP command.
    Noop,
    /// LOGOUT command.
    Logout,
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// SELECT command.
    Select {
        /// Mailbox name (UTF-8; encoded on the wire).
        mailbox: String,
    },
    /// APPEND command line announcing a synchronizing literal.
    ///
    /// The message bytes follow once the server sends a continuation.
    Append {
        /// Target mailbox name.
        mailbox: String,
        /// Flags to set on the stored message, e.g. `\Draft`.
        flags: Vec<String>,
        /// Internal date to record; the server's clock when absent.
        date: Option<DateTime<FixedOffset>>,
        /// Size of the literal that follows.
        size: usize,
    },
}

impl Command {
    /// Serializes the command with the given tag, including the trailing CRLF.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::Capability => buf.extend_from_slice(b"CAPABILITY"),
            Self::Noop => buf.extend_from_slice(b"NOOP"),
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
            Self::Login { username, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_astring(&mut buf, username);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }
            Self::Select { mailbox } => {
                buf.extend_from_slice(b"SELECT ");
                write_astring(&mut buf, &encode_mailbox(mailbox));
            }
            Self::Append {
                mailbox,
                flags,
                date,
                size,
            } => {
                buf.extend_from_slice(b"APPEND ");
                write_astring(&mut buf, &encode_mailbox(mailbox));
                if !flags.is_empty() {
                    buf.extend_from_slice(b" (");
                    buf.extend_from_slice(flags.join(" ").as_bytes());
                    buf.push(b')');
                }
                if let Some(date) = date {
                    buf.extend_from_slice(b" \"");
                    buf.extend_from_slice(internal_date(date).as_bytes());
                    buf.push(b'"');
                }
                buf.extend_from_slice(format!(" {{{size}}}").as_bytes());
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns a loggable form of the command with credentials redacted.
    #[must_use]
    pub fn redacted(&self, tag: &str) -> String {
        match self {
            Self::Login { username, .. } => format!("{tag} LOGIN {username} ***"),
            other => String::from_utf8_lossy(&other.serialize(tag))
                .trim_end()
                .to_string(),
        }
    }
}
