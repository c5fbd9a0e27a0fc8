//! SMTP reply parser.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Parses an SMTP reply from its response lines (CRLF already stripped).
///
/// - Single: `250 OK`
/// - Multi: `250-First`, `250-Second`, `250 Last`
///
/// # Errors
///
/// Returns an error if the reply is empty, a line is malformed, or the
/// lines disagree on the reply code.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let first = lines
        .first()
        .ok_or_else(|| Error::Protocol("empty reply".into()))?;
    let code = parse_code(first)?;

    let mut text = Vec::with_capacity(lines.len());
    for line in lines {
        if parse_code(line)? != code {
            return Err(Error::Protocol(format!("inconsistent reply code in {line:?}")));
        }
        match line.len() {
            3 => text.push(String::new()),
            n if n >= 4 && matches!(line.as_bytes()[3], b' ' | b'-') => {
                text.push(line[4..].to_string());
            }
            _ => return Err(Error::Protocol(format!("malformed reply line {line:?}"))),
        }
    }

    Ok(Reply::new(ReplyCode::new(code), text))
}

fn parse_code(line: &str) -> Result<u16> {
    line.get(..3)
        .filter(|c| c.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|c| c.parse().ok())
        .ok_or_else(|| Error::Protocol(format!("invalid reply code in {line:?}")))
}

/// Returns true when `line` ends a reply (`-` continues, ` ` or nothing ends).
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    line.len() == 3 || (line.len() >= 4 && line.as_bytes()[3] == b' ')
}
