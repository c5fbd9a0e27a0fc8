//! Line framing for the IMAP protocol.
//!
//! Responses are CRLF-terminated lines that may embed `{n}` literals. A
//! response is only complete once every announced literal has been read.

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum length of a single response line.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Maximum size of a literal embedded in a response.
const MAX_LITERAL_SIZE: usize = 64 * 1024 * 1024;

/// Buffered, framed IMAP connection.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
        }
    }

    /// Reads one complete response, including any embedded literals.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, connection close, or when a line or
    /// literal exceeds the size limits.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        loop {
            let line = self.read_line().await?;
            response.extend_from_slice(&line);

            let Some(len) = parse_literal_length(&line) else {
                break;
            };
            if len > MAX_LITERAL_SIZE {
                return Err(Error::Protocol(format!(
                    "literal too large: {len} bytes (max {MAX_LITERAL_SIZE})"
                )));
            }
            let mut literal = vec![0u8; len];
            self.reader.read_exact(&mut literal).await?;
            response.extend_from_slice(&literal);
        }
        Ok(response)
    }

    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        loop {
            let n = (&mut self.reader)
                .take((MAX_LINE_LENGTH - line.len()) as u64)
                .read_until(b'\n', &mut line)
                .await?;
            if n == 0 {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                )));
            }
            if line.ends_with(b"\r\n") {
                return Ok(line);
            }
            if line.len() >= MAX_LINE_LENGTH {
                return Err(Error::Protocol(format!(
                    "response line exceeds {MAX_LINE_LENGTH} bytes"
                )));
            }
            // A bare LF inside the line; keep reading until CRLF.
        }
    }

    /// Queues bytes and flushes them to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.write_buffer.extend_from_slice(data);
        self.flush().await
    }

    /// Flushes any buffered bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub async fn flush(&mut self) -> Result<()> {
        if !self.write_buffer.is_empty() {
            let stream = self.reader.get_mut();
            stream.write_all(&self.write_buffer).await?;
            self.write_buffer.clear();
        }
        self.reader.get_mut().flush().await?;
        Ok(())
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// Extracts `n` from a line ending in `{n}\r\n` or `{n+}\r\n`.
#[must_use]
pub fn parse_literal_length(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"\r\n").unwrap_or(line);
    let line = line.strip_suffix(b"}")?;
    let open = line.iter().rposition(|&b| b == b'{')?;
    let digits = &line[open + 1..];
    let digits = digits.strip_suffix(b"+").unwrap_or(digits);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn literal_lengths() {
        assert_eq!(parse_literal_length(b"* 1 FETCH (BODY[] {42}\r\n"), Some(42));
        assert_eq!(parse_literal_length(b"A1 APPEND x {7+}\r\n"), Some(7));
        assert_eq!(parse_literal_length(b"* OK done\r\n"), None);
        assert_eq!(parse_literal_length(b"* OK {}\r\n"), None);
        assert_eq!(parse_literal_length(b"* OK {x1}\r\n"), None);
    }

    #[tokio::test]
    async fn reads_line_with_literal() {
        let stream = tokio_test::io::Builder::new()
            .read(b"* 1 FETCH (BODY[] {5}\r\nhel")
            .read(b"lo)\r\nA1 OK done\r\n")
            .build();
        let mut framed = FramedStream::new(stream);

        let first = framed.read_response().await.unwrap();
        assert_eq!(first, b"* 1 FETCH (BODY[] {5}\r\nhello)\r\n");
        let second = framed.read_response().await.unwrap();
        assert_eq!(second, b"A1 OK done\r\n");
    }

    #[tokio::test]
    async fn crlf_split_across_reads() {
        let stream = tokio_test::io::Builder::new()
            .read(b"* OK ready\r")
            .read(b"\n")
            .build();
        let mut framed = FramedStream::new(stream);
        assert_eq!(framed.read_response().await.unwrap(), b"* OK ready\r\n");
    }

    #[tokio::test]
    async fn eof_is_an_error() {
        let stream = tokio_test::io::Builder::new().read(b"* OK ha").build();
        let mut framed = FramedStream::new(stream);
        assert!(matches!(framed.read_response().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn writes_are_flushed() {
        let stream = tokio_test::io::Builder::new()
            .write(b"A0 NOOP\r\n")
            .build();
        let mut framed = FramedStream::new(stream);
        framed.write_all(b"A0 NOOP\r\n").await.unwrap();
    }
}
