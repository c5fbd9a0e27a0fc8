//! Wire-format helpers for command arguments.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;

/// Writes an astring: bare when it is a valid atom, quoted otherwise.
pub fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b >= 0x7F
}

/// Encodes a mailbox name in modified UTF-7 (RFC 3501 section 5.1.3).
///
/// Printable ASCII passes through, `&` becomes `&-`, and every other run
/// of characters is UTF-16BE, base64 with `,` for `/`, wrapped in `&`…`-`.
#[must_use]
pub fn encode_mailbox(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending: Vec<u16> = Vec::new();

    for ch in name.chars() {
        if (' '..='~').contains(&ch) {
            flush_shifted(&mut out, &mut pending);
            if ch == '&' {
                out.push_str("&-");
            } else {
                out.push(ch);
            }
        } else {
            let mut units = [0u16; 2];
            pending.extend_from_slice(ch.encode_utf16(&mut units));
        }
    }
    flush_shifted(&mut out, &mut pending);
    out
}

fn flush_shifted(out: &mut String, pending: &mut Vec<u16>) {
    if pending.is_empty() {
        return;
    }
    let bytes: Vec<u8> = pending.iter().flat_map(|u| u.to_be_bytes()).collect();
    out.push('&');
    out.push_str(&STANDARD_NO_PAD.encode(bytes).replace('/', ","));
    out.push('-');
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn astring(s: &str) -> String {
        let mut buf = Vec::new();
        write_astring(&mut buf, s);
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn atoms_stay_bare() {
        assert_eq!(astring("Drafts"), "Drafts");
        assert_eq!(astring("INBOX.Drafts"), "INBOX.Drafts");
    }

    #[test]
    fn specials_are_quoted() {
        assert_eq!(astring(""), "\"\"");
        assert_eq!(astring("a b"), "\"a b\"");
        assert_eq!(astring("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn ascii_mailbox_unchanged() {
        assert_eq!(encode_mailbox("Drafts"), "Drafts");
        assert_eq!(encode_mailbox("Tom & Jerry"), "Tom &- Jerry");
    }

    #[test]
    fn non_ascii_mailbox_is_shifted() {
        // Examples from RFC 3501 section 5.1.3.
        assert_eq!(encode_mailbox("~peter/mail/台北/日本語"), "~peter/mail/&U,BTFw-/&ZeVnLIqe-");
        assert_eq!(encode_mailbox("Entwürfe"), "Entw&APw-rfe");
    }

    proptest::proptest! {
        #[test]
        fn encoded_mailbox_is_printable_ascii(name in "\\PC{0,24}") {
            let encoded = encode_mailbox(&name);
            proptest::prop_assert!(encoded.bytes().all(|b| (0x20..0x7F).contains(&b)));
        }

        #[test]
        fn quoted_astring_round_trips(s in "[ -~]{0,32}") {
            let quoted = astring(&s);
            let decoded = match quoted.strip_prefix('"').and_then(|q| q.strip_suffix('"')) {
                Some(inner) => {
                    let mut out = String::new();
                    let mut chars = inner.chars();
                    while let Some(c) = chars.next() {
                        out.push(if c == '\\' { chars.next().unwrap_or(c) } else { c });
                    }
                    out
                }
                None => quoted.clone(),
            };
            proptest::prop_assert_eq!(decoded, s);
        }
    }
}
