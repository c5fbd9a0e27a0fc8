//! # attachmail-core
//!
//! The attachment mailer: an agent tool that emails a file.
//!
//! A call runs three steps in order:
//!
//! 1. **Resolve** the bare filename against the input resource root, then
//!    the output resource root ([`resolve`]).
//! 2. **Compose** a MIME message with the configured signature and the
//!    file attached ([`compose`]).
//! 3. **Deliver** it: the placeholder recipient `example@example.com` or
//!    draft mode saves it to an IMAP drafts folder, anything else is
//!    submitted over SMTP with STARTTLS ([`mailer`]).
//!
//! Every call ends in a [`MailOutcome`] whose string form is what the
//! host agent sees; failures always start with `Error:`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use attachmail_core::{AttachmentMailer, AttachmentRequest, DeliveryConfig, EnvSource, NetworkConnector};
//!
//! let config = DeliveryConfig::from_source(&EnvSource);
//! let mailer = AttachmentMailer::new(config, NetworkConnector::default());
//!
//! let request = AttachmentRequest {
//!     to: "friend@example.org".into(),
//!     subject: "Report".into(),
//!     body: "Attached.".into(),
//!     filename: "report.pdf".into(),
//! };
//! println!("{}", mailer.execute(&request).await);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
mod error;
pub mod mailer;
pub mod net;
pub mod request;
pub mod resolve;
pub mod tool;
pub mod transport;

pub use config::{ConfigSource, DeliveryConfig, EnvSource, Layered, MapSource};
pub use error::{Error, ErrorKind, MailOutcome, Result};
pub use mailer::AttachmentMailer;
pub use net::NetworkConnector;
pub use request::AttachmentRequest;
pub use resolve::PathResolver;
pub use tool::{SendEmailAttachmentTool, ToolDescriptor};
pub use transport::{Connector, DraftParams, DraftSession, SmtpParams, SmtpSession};
