//! Classification of server response lines.
//!
//! Draft delivery only needs to know whether a line is a continuation,
//! untagged data, or the tagged completion of a command, plus a few pieces
//! of untagged data (capabilities, EXISTS, READ-ONLY).

use crate::{Error, Result};

/// Status condition of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// OK - success.
    Ok,
    /// NO - operational failure.
    No,
    /// BAD - protocol or syntax error.
    Bad,
    /// PREAUTH - greeting for an already authenticated connection.
    PreAuth,
    /// BYE - server is closing the connection.
    Bye,
}

impl Status {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "OK" => Some(Self::Ok),
            "NO" => Some(Self::No),
            "BAD" => Some(Self::Bad),
            "PREAUTH" => Some(Self::PreAuth),
            "BYE" => Some(Self::Bye),
            _ => None,
        }
    }
}

/// A parsed server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `+ text` - the server is ready for literal data.
    Continuation {
        /// Text after the `+`.
        text: String,
    },
    /// `* ...` - untagged data or status.
    Untagged {
        /// Status condition, for `* OK`/`* NO`/`* BAD`/`* PREAUTH`/`* BYE`.
        status: Option<Status>,
        /// Bracketed response code, without the brackets.
        code: Option<String>,
        /// Remaining text.
        text: String,
    },
    /// `tag STATUS text` - completion of a command.
    Tagged {
        /// Command tag.
        tag: String,
        /// Completion status.
        status: Status,
        /// Bracketed response code, without the brackets.
        code: Option<String>,
        /// Human-readable text.
        text: String,
    },
}

impl Response {
    /// Parses one response line (a trailing CRLF is ignored).
    ///
    /// # Errors
    ///
    /// Returns an error for an empty line or a tagged line without a valid
    /// status.
    pub fn parse(line: &[u8]) -> Result<Self> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(rest) = line.strip_prefix('+') {
            return Ok(Self::Continuation {
                text: rest.trim_start().to_string(),
            });
        }

        let (first, rest) = split_word(line);
        if first.is_empty() {
            return Err(Error::Protocol("empty response line".to_string()));
        }

        if first == "*" {
            let (word, after) = split_word(rest);
            return Ok(match Status::parse(word) {
                Some(status) => {
                    let (code, text) = split_code(after);
                    Self::Untagged {
                        status: Some(status),
                        code,
                        text,
                    }
                }
                None => Self::Untagged {
                    status: None,
                    code: None,
                    text: rest.to_string(),
                },
            });
        }

        let (word, after) = split_word(rest);
        let status = Status::parse(word)
            .ok_or_else(|| Error::Protocol(format!("tagged response without status: {line}")))?;
        let (code, text) = split_code(after);
        Ok(Self::Tagged {
            tag: first.to_string(),
            status,
            code,
            text,
        })
    }

    /// Capabilities announced by `* CAPABILITY ...` or a `[CAPABILITY ...]` code.
    #[must_use]
    pub fn capabilities(&self) -> Option<Vec<String>> {
        let list = match self {
            Self::Untagged {
                status: None, text, ..
            } => strip_keyword(text, "CAPABILITY")?,
            Self::Untagged {
                code: Some(code), ..
            }
            | Self::Tagged {
                code: Some(code), ..
            } => strip_keyword(code, "CAPABILITY")?,
            _ => return None,
        };
        Some(list.split_whitespace().map(str::to_string).collect())
    }

    /// Message count from `* n EXISTS`.
    #[must_use]
    pub fn exists(&self) -> Option<u32> {
        match self {
            Self::Untagged {
                status: None, text, ..
            } => {
                let (count, keyword) = split_word(text);
                if keyword.eq_ignore_ascii_case("EXISTS") {
                    count.parse().ok()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Returns the bracketed response code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Untagged { code, .. } | Self::Tagged { code, .. } => code.as_deref(),
            Self::Continuation { .. } => None,
        }
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    s.split_once(' ').unwrap_or((s, ""))
}

fn split_code(s: &str) -> (Option<String>, String) {
    let s = s.trim_start();
    if let Some(inner) = s.strip_prefix('[')
        && let Some((code, text)) = inner.split_once(']')
    {
        return (Some(code.to_string()), text.trim_start().to_string());
    }
    (None, s.to_string())
}

fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let (word, rest) = split_word(s);
    word.eq_ignore_ascii_case(keyword).then_some(rest)
}
