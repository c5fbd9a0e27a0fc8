//! Address list headers (`From`, `To`, `Cc`, ...).
//!
//! Only the display name of a mailbox may be RFC 2047 encoded; the
//! `<addr>` part is always written as given.

use crate::encoding::{encode_rfc2047, needs_rfc2047};

/// Header names whose values are address lists.
const ADDRESS_HEADERS: &[&str] = &["from", "to", "cc", "bcc", "reply-to", "sender"];

/// Returns true if `name` is an address list header.
#[must_use]
pub fn is_address_header(name: &str) -> bool {
    ADDRESS_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Splits an address list on the commas that separate mailboxes.
///
/// Commas inside a quoted display name, a `<...>` address, or a comment
/// do not split. Entries are trimmed and empty entries dropped.
#[must_use]
pub fn split_address_list(value: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    let mut angle = 0u32;
    let mut comment = 0u32;

    for (idx, ch) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if quoted || comment > 0 => escaped = true,
            '"' if comment == 0 => quoted = !quoted,
            '(' if !quoted => comment += 1,
            ')' if !quoted => comment = comment.saturating_sub(1),
            '<' if !quoted && comment == 0 => angle += 1,
            '>' if !quoted && comment == 0 => angle = angle.saturating_sub(1),
            ',' if !quoted && angle == 0 && comment == 0 => {
                entries.push(value[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    entries.push(value[start..].trim());
    entries.retain(|e| !e.is_empty());
    entries
}

/// Returns the addr-spec of one mailbox: the text inside the last
/// `<...>`, or the whole entry when there is none.
#[must_use]
pub fn mailbox_address(mailbox: &str) -> &str {
    match (mailbox.rfind('<'), mailbox.rfind('>')) {
        (Some(open), Some(close)) if open < close => mailbox[open + 1..close].trim(),
        _ => mailbox.trim(),
    }
}

/// Encodes an address list for the wire.
///
/// A display name with non-ASCII characters becomes encoded words; the
/// angle address stays readable. Values that need no encoding are
/// returned unchanged.
#[must_use]
pub fn encode_address_list(value: &str) -> String {
    if !needs_rfc2047(value) {
        return value.to_string();
    }
    split_address_list(value)
        .into_iter()
        .map(encode_mailbox)
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode_mailbox(mailbox: &str) -> String {
    let (Some(open), Some(close)) = (mailbox.rfind('<'), mailbox.rfind('>')) else {
        return mailbox.to_string();
    };
    if open > close {
        return mailbox.to_string();
    }

    let phrase = mailbox[..open].trim();
    let addr = &mailbox[open..=close];
    if phrase.is_empty() {
        return addr.to_string();
    }
    if !needs_rfc2047(phrase) {
        return format!("{phrase} {addr}");
    }

    let phrase = phrase
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .map_or_else(|| phrase.to_string(), |p| p.replace("\\\"", "\"").replace("\\\\", "\\"));
    format!("{} {addr}", encode_rfc2047(&phrase))
}
