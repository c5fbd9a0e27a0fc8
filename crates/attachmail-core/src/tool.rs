//! The agent-facing tool surface.

use serde::Serialize;
use serde_json::{Value, json};

use crate::mailer::AttachmentMailer;
use crate::request::AttachmentRequest;
use crate::transport::Connector;
use crate::{DeliveryConfig, MailOutcome};

/// Tool name shown to the agent.
pub const TOOL_NAME: &str = "Send Email with Attachment";

/// Tool description shown to the agent.
pub const TOOL_DESCRIPTION: &str = "Send an Email with a file attached to it";

/// Name, description, and JSON Schema of the tool's arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    /// Tool name.
    pub name: &'static str,
    /// Tool description.
    pub description: &'static str,
    /// JSON Schema for [`AttachmentRequest`].
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Describes the attachment mailer tool.
    #[must_use]
    pub fn attachment_mailer() -> Self {
        Self {
            name: TOOL_NAME,
            description: TOOL_DESCRIPTION,
            parameters: json!({
                "type": "object",
                "properties": {
                    "to": {
                        "type": "string",
                        "description": "Email Address of the Receiver, default email address is 'example@example.com'"
                    },
                    "subject": {
                        "type": "string",
                        "description": "Subject of the Email to be sent"
                    },
                    "body": {
                        "type": "string",
                        "description": "Email Body to be sent"
                    },
                    "filename": {
                        "type": "string",
                        "description": "Name of the file to be sent as an Attachment with Email"
                    }
                },
                "required": ["to", "subject", "body", "filename"]
            }),
        }
    }
}

/// Wraps an [`AttachmentMailer`] for a host agent: arguments in, status
/// string out.
#[derive(Debug)]
pub struct SendEmailAttachmentTool<C> {
    mailer: AttachmentMailer<C>,
}

impl<C: Connector> SendEmailAttachmentTool<C> {
    /// Creates the tool.
    #[must_use]
    pub fn new(config: DeliveryConfig, connector: C) -> Self {
        Self::from_mailer(AttachmentMailer::new(config, connector))
    }

    /// Creates the tool around an existing mailer.
    #[must_use]
    pub const fn from_mailer(mailer: AttachmentMailer<C>) -> Self {
        Self { mailer }
    }

    /// Returns the tool descriptor.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::attachment_mailer()
    }

    /// Runs the tool and returns the status string.
    pub async fn execute(&self, request: &AttachmentRequest) -> String {
        self.mailer.execute(request).await.to_string()
    }

    /// Runs the tool on a JSON argument object.
    pub async fn execute_json(&self, args: &[u8]) -> String {
        match AttachmentRequest::from_json(args) {
            Ok(request) => self.execute(&request).await,
            Err(err) => MailOutcome::from(err).to_string(),
        }
    }

    /// Returns the underlying mailer.
    #[must_use]
    pub const fn mailer(&self) -> &AttachmentMailer<C> {
        &self.mailer
    }
}
