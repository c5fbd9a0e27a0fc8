//! # attachmail-mime
//!
//! MIME message generation for outgoing email.
//!
//! ## Features
//!
//! - **Message generation**: a text body plus any number of attachments
//! - **Encoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//! - **Content types**: parsing, display, and guessing from file names
//!
//! ## Quick Start
//!
//! ```ignore
//! use attachmail_mime::{Attachment, MessageBuilder, guess_content_type};
//!
//! let data = std::fs::read("report.pdf")?;
//! let attachment = Attachment::new("report.pdf", guess_content_type("report.pdf"), data);
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Quarterly report")
//!     .text_body("Please find the report attached.")
//!     .attach(attachment)
//!     .build()?;
//!
//! let wire: Vec<u8> = message.to_bytes();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod guess;
mod header;
mod message;

pub mod address;
pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use guess::guess_content_type;
pub use header::Headers;
pub use message::{Attachment, Message, MessageBuilder, Part, TransferEncoding};
