//! MIME encoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 header encoding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum encoded line length for Base64 and Quoted-Printable bodies.
pub const MAX_LINE_LENGTH: usize = 76;

/// Payload bytes per RFC 2047 encoded-word, keeping each word within 75
/// characters (`=?utf-8?B?` + 60 base64 characters + `?=`).
const ENCODED_WORD_BYTES: usize = 45;

/// Encodes data as Base64 on a single line.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 split into CRLF-separated lines of at most
/// [`MAX_LINE_LENGTH`] characters. No trailing line break is added.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);
    for (i, chunk) in encoded.as_bytes().chunks(MAX_LINE_LENGTH).enumerate() {
        if i > 0 {
            out.push_str("\r\n");
        }
        // Base64 output is pure ASCII.
        out.push_str(&String::from_utf8_lossy(chunk));
    }
    out
}

/// Decodes Base64 data, ignoring line breaks and other whitespace.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks in the input (`\n` or `\r\n`) become hard CRLF breaks.
/// Long lines get soft breaks so no output line exceeds
/// [`MAX_LINE_LENGTH`] characters, and trailing whitespace is encoded.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            result.push_str("\r\n");
        }
        let line = line.strip_suffix('\r').unwrap_or(line).as_bytes();
        let mut line_length = 0;

        for (j, &byte) in line.iter().enumerate() {
            let at_end = j + 1 == line.len();
            let literal = match byte {
                b'!'..=b'<' | b'>'..=b'~' => true,
                b' ' | b'\t' => !at_end,
                _ => false,
            };
            let width = if literal { 1 } else { 3 };

            // Leave room for the trailing `=` of a soft break.
            if line_length + width > MAX_LINE_LENGTH - 1 {
                result.push_str("=\r\n");
                line_length = 0;
            }

            if literal {
                result.push(char::from(byte));
            } else {
                // Writing to a String never fails
                let _ = write!(result, "={byte:02X}");
            }
            line_length += width;
        }
    }

    result
}

/// Decodes Quoted-Printable text.
///
/// # Errors
///
/// Returns an error on a malformed `=XX` escape or non-UTF-8 output.
pub fn decode_quoted_printable(text: &str) -> Result<String> {
    let mut out = Vec::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        // Soft line break.
        if bytes[i + 1..].starts_with(b"\r\n") {
            i += 3;
            continue;
        }
        if bytes[i + 1..].starts_with(b"\n") {
            i += 2;
            continue;
        }
        let hex = bytes
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| Error::InvalidEncoding(format!("bad quoted-printable escape at {i}")))?;
        out.push(hex);
        i += 3;
    }

    String::from_utf8(out).map_err(|e| Error::InvalidEncoding(e.to_string()))
}

/// Returns true if a header value cannot be sent as-is.
#[must_use]
pub fn needs_rfc2047(value: &str) -> bool {
    value.chars().any(|c| !c.is_ascii() || (c.is_ascii_control() && c != '\t'))
}

/// Encodes a header value as RFC 2047 `=?utf-8?B?...?=` words when it
/// contains non-ASCII or control characters; other values are returned
/// unchanged. Multiple words are separated by folding whitespace.
#[must_use]
pub fn encode_rfc2047(value: &str) -> String {
    if !needs_rfc2047(value) {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_len = 0;
    for (idx, ch) in value.char_indices() {
        if chunk_len + ch.len_utf8() > ENCODED_WORD_BYTES {
            words.push(&value[chunk_start..idx]);
            chunk_start = idx;
            chunk_len = 0;
        }
        chunk_len += ch.len_utf8();
    }
    words.push(&value[chunk_start..]);

    words
        .into_iter()
        .map(|w| format!("=?utf-8?B?{}?=", STANDARD.encode(w)))
        .collect::<Vec<_>>()
        .join("\r\n ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn base64_wraps_at_76() {
        let data = vec![0xABu8; 200];
        let encoded = encode_base64_wrapped(&data);
        let lines: Vec<&str> = encoded.split("\r\n").collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[..3].iter().all(|l| l.len() == 76));
        assert_eq!(decode_base64(&encoded).unwrap(), data);
    }

    #[test]
    fn base64_empty() {
        assert_eq!(encode_base64_wrapped(b""), "");
        assert_eq!(encode_base64(b"hi"), "aGk=");
    }

    #[test]
    fn quoted_printable_basics() {
        assert_eq!(encode_quoted_printable("a=b"), "a=3Db");
        assert_eq!(encode_quoted_printable("caf\u{e9}"), "caf=C3=A9");
        assert_eq!(encode_quoted_printable("trailing \nnext"), "trailing=20\r\nnext");
        assert_eq!(encode_quoted_printable("crlf\r\nkept"), "crlf\r\nkept");
    }

    #[test]
    fn quoted_printable_soft_breaks() {
        let long = "x".repeat(100);
        let encoded = encode_quoted_printable(&long);
        let first = encoded.split("\r\n").next().unwrap();
        assert_eq!(first.len(), 76);
        assert!(first.ends_with('='));
        assert_eq!(decode_quoted_printable(&encoded).unwrap(), long);
    }

    #[test]
    fn rfc2047_only_when_needed() {
        assert_eq!(encode_rfc2047("Plain subject"), "Plain subject");
        assert_eq!(encode_rfc2047("Caf\u{e9}"), "=?utf-8?B?Q2Fmw6k=?=");
    }

    #[test]
    fn rfc2047_splits_long_values_on_char_boundaries() {
        let value = "\u{e9}".repeat(40);
        let encoded = encode_rfc2047(&value);
        let words: Vec<&str> = encoded.split("\r\n ").collect();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.len() <= 75));
    }

    proptest! {
        #[test]
        fn quoted_printable_lines_fit(text in "\\PC{0,300}") {
            let encoded = encode_quoted_printable(&text);
            for line in encoded.split("\r\n") {
                prop_assert!(line.len() <= MAX_LINE_LENGTH);
                prop_assert!(line.is_ascii());
            }
        }

        #[test]
        fn quoted_printable_round_trips(text in "[a-z \\t=\u{e9}\u{4e2d}]{0,200}") {
            prop_assert_eq!(decode_quoted_printable(&encode_quoted_printable(&text)).unwrap(), text);
        }

        #[test]
        fn base64_lines_fit(data in proptest::collection::vec(any::<u8>(), 0..600)) {
            let encoded = encode_base64_wrapped(&data);
            prop_assert!(encoded.split("\r\n").all(|l| l.len() <= MAX_LINE_LENGTH));
        }
    }
}
