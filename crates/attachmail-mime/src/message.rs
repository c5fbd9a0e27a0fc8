//! Outgoing MIME message structure and builder.

use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Local};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::content_type::ContentType;
use crate::encoding::{encode_base64_wrapped, encode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;

/// Longest text line sent without quoted-printable encoding.
const MAX_7BIT_LINE: usize = 78;

/// Transfer encoding types used for generated parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII with short lines.
    SevenBit,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Base64 encoding.
    Base64,
}

impl TransferEncoding {
    /// Picks the encoding for a text body: 7bit when it is plain ASCII
    /// with short lines, quoted-printable otherwise.
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        let plain = text.split('\n').all(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            line.len() <= MAX_7BIT_LINE
                && line
                    .bytes()
                    .all(|b| b == b'\t' || (b' '..=b'~').contains(&b))
        });
        if plain {
            Self::SevenBit
        } else {
            Self::QuotedPrintable
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the recipient.
    pub filename: String,
    /// Content type of the data.
    pub content_type: ContentType,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment.
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }

    /// Returns the `Content-Disposition` value for this attachment.
    ///
    /// Non-ASCII names use the RFC 2231 `filename*` form.
    #[must_use]
    pub fn disposition(&self) -> String {
        let name = &self.filename;
        if name.bytes().all(|b| (b' '..=b'~').contains(&b)) {
            let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
            format!("attachment; filename=\"{escaped}\"")
        } else {
            let mut encoded = String::with_capacity(name.len() * 3);
            for b in name.bytes() {
                if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
                    encoded.push(char::from(b));
                } else {
                    // Writing to a String never fails
                    let _ = write!(encoded, "%{b:02X}");
                }
            }
            format!("attachment; filename*=utf-8''{encoded}")
        }
    }

    fn to_part(&self) -> Part {
        let mut headers = Headers::new();
        headers.add("Content-Type", self.content_type.to_string());
        headers.add("Content-Transfer-Encoding", TransferEncoding::Base64.to_string());
        headers.add("Content-Disposition", self.disposition());
        Part::new(headers, encode_base64_wrapped(&self.data))
    }
}

/// One body part of a multipart message, already transfer-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Encoded body, CRLF line endings.
    pub body: String,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: String) -> Self {
        Self { headers, body }
    }

    fn text(text: &str) -> (Self, TransferEncoding) {
        let encoding = TransferEncoding::for_text(text);
        let body = match encoding {
            TransferEncoding::SevenBit => normalize_crlf(text),
            _ => encode_quoted_printable(text),
        };
        let mut headers = Headers::new();
        headers.add("Content-Type", ContentType::text_plain().to_string());
        headers.add("Content-Transfer-Encoding", encoding.to_string());
        (Self::new(headers, body), encoding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Single(String),
    Multipart { boundary: String, parts: Vec<Part> },
}

/// A composed message ready for submission or APPEND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    headers: Headers,
    text: String,
    attachments: Vec<Attachment>,
    body: Body,
}

impl Message {
    /// Returns the top-level headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Returns the text body as given to the builder.
    #[must_use]
    pub fn text_body(&self) -> &str {
        &self.text
    }

    /// Returns the attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns true if the message has attachments.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self.body, Body::Multipart { .. })
    }

    /// Returns the multipart boundary, if any.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        match &self.body {
            Body::Multipart { boundary, .. } => Some(boundary),
            Body::Single(_) => None,
        }
    }

    /// Serializes the message with CRLF line endings.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.headers)?;
        match &self.body {
            Body::Single(body) => write!(f, "{body}\r\n"),
            Body::Multipart { boundary, parts } => {
                write!(f, "This is a multi-part message in MIME format.\r\n")?;
                for part in parts {
                    write!(f, "\r\n--{boundary}\r\n{}\r\n{}\r\n", part.headers, part.body)?;
                }
                write!(f, "\r\n--{boundary}--\r\n")
            }
        }
    }
}

/// Builder for outgoing messages.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Option<String>,
    to: Vec<String>,
    subject: Option<String>,
    date: Option<DateTime<FixedOffset>>,
    text: String,
    attachments: Vec<Attachment>,
    boundary: Option<String>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the From header.
    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Adds a recipient to the To header.
    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to.push(to.into());
        self
    }

    /// Sets the Subject header.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the Date header; the current local time is used otherwise.
    #[must_use]
    pub const fn date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the plain text body.
    #[must_use]
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Fixes the multipart boundary instead of generating a random one.
    #[must_use]
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if From or To is missing.
    pub fn build(self) -> Result<Message> {
        let from = self
            .from
            .ok_or_else(|| Error::MissingHeader("From".to_string()))?;
        if self.to.is_empty() {
            return Err(Error::MissingHeader("To".to_string()));
        }
        let date = self.date.unwrap_or_else(|| Local::now().fixed_offset());

        let mut headers = Headers::new();
        headers.add("From", from);
        headers.add("To", self.to.join(", "));
        headers.add("Subject", self.subject.unwrap_or_default());
        headers.add("Date", date.to_rfc2822());
        headers.add("MIME-Version", "1.0");

        let (text_part, encoding) = Part::text(&self.text);
        let body = if self.attachments.is_empty() {
            headers.add("Content-Type", ContentType::text_plain().to_string());
            headers.add("Content-Transfer-Encoding", encoding.to_string());
            Body::Single(text_part.body)
        } else {
            let boundary = self.boundary.unwrap_or_else(generate_boundary);
            headers.add(
                "Content-Type",
                ContentType::multipart_mixed(boundary.as_str()).to_string(),
            );
            let mut parts = Vec::with_capacity(self.attachments.len() + 1);
            parts.push(text_part);
            parts.extend(self.attachments.iter().map(Attachment::to_part));
            Body::Multipart { boundary, parts }
        };

        Ok(Message {
            headers,
            text: self.text,
            attachments: self.attachments,
            body,
        })
    }
}

fn generate_boundary() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("attachmail-{token}")
}

fn normalize_crlf(text: &str) -> String {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\r\n")
}
