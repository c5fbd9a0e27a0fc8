//! SMTP reply types.

use std::fmt;

/// A complete, possibly multi-line, server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Code shared by every line.
    pub code: ReplyCode,
    /// Text after the code on each line.
    pub lines: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    pub const fn new(code: ReplyCode, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// Returns true for a 2xx reply.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Multi-line text, one line per `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Three-digit SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Greeting and post-STARTTLS readiness.
    pub const SERVICE_READY: Self = Self(220);
    /// Reply to QUIT.
    pub const CLOSING: Self = Self(221);
    /// AUTH accepted.
    pub const AUTH_SUCCEEDED: Self = Self(235);
    /// Generic success.
    pub const OK: Self = Self(250);
    /// AUTH challenge; the client answers with a base64 line.
    pub const AUTH_CONTINUE: Self = Self(334);
    /// Go ahead with the DATA payload.
    pub const START_DATA: Self = Self(354);
    /// EHLO unknown to the server; retry with HELO.
    pub const NOT_IMPLEMENTED: Self = Self(502);
    /// Credentials rejected.
    pub const AUTH_FAILED: Self = Self(535);

    /// Creates a reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// First digit of the code.
    #[must_use]
    pub const fn class(self) -> u16 {
        self.0 / 100
    }

    /// 2xx: the command completed.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.class() == 2
    }

    /// 3xx: the server waits for more input.
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.class() == 3
    }

    /// 4xx: try again later.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.class() == 4
    }

    /// 5xx: do not retry as-is.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.class() == 5
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
