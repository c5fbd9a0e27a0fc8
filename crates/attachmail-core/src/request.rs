//! The tool's input.

use serde::{Deserialize, Serialize};

/// What the host agent asks for: one email with one attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRequest {
    /// Recipient address. `example@example.com` saves a draft instead.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    /// Bare name of the file to attach, looked up under the resource roots.
    pub filename: String,
}

impl AttachmentRequest {
    /// Parses the host's JSON argument object.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing or not a string.
    pub fn from_json(args: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(args)?)
    }
}
