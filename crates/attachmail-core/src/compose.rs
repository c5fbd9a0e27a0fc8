//! Message composition.

use std::path::Path;

use attachmail_mime::address::{mailbox_address, split_address_list};
use attachmail_mime::{Attachment, Message, MessageBuilder, guess_content_type};
use tracing::debug;

use crate::config::DeliveryConfig;
use crate::request::AttachmentRequest;
use crate::{Error, Result};

/// Returns `body` with the signature appended on a new line.
///
/// An empty signature leaves the body untouched.
#[must_use]
pub fn body_with_signature(body: &str, signature: Option<&str>) -> String {
    match signature {
        Some(signature) if !signature.is_empty() => format!("{body}\n{signature}"),
        _ => body.to_string(),
    }
}

/// Extracts the envelope recipients from a `To` value.
///
/// Mailboxes are separated by commas outside quoted names and `<...>`;
/// `Name <addr>` yields `addr`. Empty entries are dropped.
#[must_use]
pub fn envelope_recipients(to: &str) -> Vec<String> {
    split_address_list(to)
        .into_iter()
        .map(mailbox_address)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the message for `request`, attaching the file at `attachment`.
///
/// The attachment's content type is guessed from its name, falling back
/// to `application/octet-stream`.
///
/// # Errors
///
/// Returns [`Error::Attachment`] if the file cannot be read, or a MIME
/// error if the message cannot be built.
pub async fn compose(
    config: &DeliveryConfig,
    request: &AttachmentRequest,
    attachment: Option<&Path>,
) -> Result<Message> {
    let body = body_with_signature(&request.body, config.signature.as_deref());
    let mut builder = MessageBuilder::new()
        .from(config.email_address.trim())
        .to(request.to.as_str())
        .subject(request.subject.as_str())
        .text_body(body);

    if let Some(path) = attachment {
        let data = tokio::fs::read(path).await.map_err(|source| Error::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        let content_type = guess_content_type(path);
        let filename = path
            .file_name()
            .map_or_else(|| request.filename.clone(), |n| n.to_string_lossy().into_owned());
        debug!(
            filename = %filename,
            content_type = %content_type,
            size = data.len(),
            "attaching file"
        );
        builder = builder.attach(Attachment::new(filename, content_type, data));
    }

    Ok(builder.build()?)
}
