//! MIME header handling.

use crate::address::{encode_address_list, is_address_header};
use crate::encoding::encode_rfc2047;
use std::fmt;

/// Ordered collection of email headers.
///
/// Names keep the case they were added with; lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders `Name: value` lines terminated by CRLF, encoding values that
/// are not plain ASCII. In address headers only display names are
/// encoded.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            let value = if is_address_header(name) {
                encode_address_list(value)
            } else {
                encode_rfc2047(value)
            };
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("X-Missing"), None);
    }

    #[test]
    fn iterates_in_insertion_order() {
        let mut headers = Headers::new();
        headers.add("From", "a@example.com");
        headers.add("To", "alice@example.com");
        headers.add("Subject", "hi");
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["From", "To", "Subject"]);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn display_keeps_order_and_encodes() {
        let mut headers = Headers::new();
        headers.add("Subject", "R\u{e9}sum\u{e9}");
        headers.add("From", "sender@example.com");
        assert_eq!(
            headers.to_string(),
            "Subject: =?utf-8?B?UsOpc3Vtw6k=?=\r\nFrom: sender@example.com\r\n"
        );
    }

    #[test]
    fn address_header_keeps_addr_spec() {
        let mut headers = Headers::new();
        headers.add("To", "Jos\u{e9} <jose@example.org>");
        assert_eq!(headers.get("to"), Some("Jos\u{e9} <jose@example.org>"));
        assert_eq!(
            headers.to_string(),
            "To: =?utf-8?B?Sm9zw6k=?= <jose@example.org>\r\n"
        );
    }
}
