//! Integration tests for the IMAP client.
//!
//! A mock stream replays scripted server responses and records everything
//! the client writes.

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use chrono::{FixedOffset, TimeZone};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use attachmail_imap::{Client, Error};

/// Mock stream that returns predefined responses.
struct MockStream {
    responses: Cursor<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl MockStream {
    fn new(responses: &[u8]) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let stream = Self {
            responses: Cursor::new(responses.to_vec()),
            sent: Arc::clone(&sent),
        };
        (stream, sent)
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let data = self.responses.get_ref();
        let pos = usize::try_from(self.responses.position()).unwrap();
        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_read]);
        self.responses.set_position((pos + to_read) as u64);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn sent_text(sent: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(sent.lock().unwrap().clone()).unwrap()
}

#[tokio::test]
async fn draft_append_flow() {
    let script = b"* OK [CAPABILITY IMAP4rev1 AUTH=PLAIN] ready\r\n\
A0000 OK [CAPABILITY IMAP4rev1 UIDPLUS] Logged in\r\n\
* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
* 4 EXISTS\r\n\
* 0 RECENT\r\n\
A0001 OK [READ-WRITE] SELECT completed\r\n\
+ Ready for literal data\r\n\
A0002 OK [APPENDUID 1 5] APPEND completed\r\n\
* BYE Logging out\r\n\
A0003 OK LOGOUT completed\r\n";
    let (stream, sent) = MockStream::new(script);

    let client = Client::from_stream(stream).await.unwrap();
    assert!(client.has_capability("auth=plain"));

    let client = client.login("me@example.com", "secret").await.unwrap();
    assert!(client.has_capability("UIDPLUS"));

    let (mut client, status) = client.select("Drafts").await.unwrap();
    assert_eq!(status.exists, 4);
    assert!(!status.read_only);

    let date = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 16, 8, 0, 0)
        .unwrap();
    let message = b"Subject: hi\r\n\r\nbody\r\n";
    client.append("Drafts", &[], Some(date), message).await.unwrap();
    client.logout().await.unwrap();

    assert_eq!(
        sent_text(&sent),
        "A0000 LOGIN me@example.com secret\r\n\
A0001 SELECT Drafts\r\n\
A0002 APPEND Drafts \"16-Oct-2026 08:00:00 +0000\" {21}\r\n\
Subject: hi\r\n\r\nbody\r\n\r\n\
A0003 LOGOUT\r\n"
    );
}

#[tokio::test]
async fn login_rejected() {
    let script = b"* OK ready\r\nA0000 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n";
    let (stream, _sent) = MockStream::new(script);

    let client = Client::from_stream(stream).await.unwrap();
    let err = client.login("me@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Auth(text) if text == "Invalid credentials"));
}

#[tokio::test]
async fn login_disabled_is_refused_locally() {
    let script = b"* OK [CAPABILITY IMAP4rev1 LOGINDISABLED] ready\r\n";
    let (stream, sent) = MockStream::new(script);

    let client = Client::from_stream(stream).await.unwrap();
    assert!(matches!(
        client.login("me", "pw").await,
        Err(Error::Auth(_))
    ));
    assert!(sent_text(&sent).is_empty());
}

#[tokio::test]
async fn bye_greeting_is_an_error() {
    let (stream, _sent) = MockStream::new(b"* BYE Too many connections\r\n");
    assert!(matches!(
        Client::from_stream(stream).await,
        Err(Error::Bye(text)) if text == "Too many connections"
    ));
}

#[tokio::test]
async fn select_missing_mailbox() {
    let script = b"* OK ready\r\nA0000 OK done\r\nA0001 NO [NONEXISTENT] Mailbox doesn't exist\r\n";
    let (stream, _sent) = MockStream::new(script);

    let client = Client::from_stream(stream).await.unwrap();
    let client = client.login("me", "pw").await.unwrap();
    assert!(matches!(client.select("Brouillons").await, Err(Error::No(_))));
}

#[tokio::test]
async fn append_refused_before_literal() {
    let script = b"* OK ready\r\nA0000 OK done\r\nA0001 NO [TRYCREATE] No such mailbox\r\n";
    let (stream, sent) = MockStream::new(script);

    let client = Client::from_stream(stream).await.unwrap();
    let mut client = client.login("me", "pw").await.unwrap();
    let err = client
        .append("Nope", &["\\Draft"], None, b"x")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::No(_)));
    assert!(sent_text(&sent).ends_with("A0001 APPEND Nope (\\Draft) {1}\r\n"));
}

#[tokio::test]
async fn read_only_select() {
    let script = b"* OK ready\r\nA0000 OK done\r\n* 0 EXISTS\r\nA0001 OK [READ-ONLY] done\r\n";
    let (stream, _sent) = MockStream::new(script);

    let client = Client::from_stream(stream).await.unwrap();
    let client = client.login("me", "pw").await.unwrap();
    let (_client, status) = client.select("Drafts").await.unwrap();
    assert!(status.read_only);
    assert_eq!(status.exists, 0);
}

#[tokio::test]
async fn eof_mid_command() {
    let (stream, _sent) = MockStream::new(b"* OK ready\r\n");
    let mut client = Client::from_stream(stream).await.unwrap();
    assert!(matches!(client.noop().await, Err(Error::Io(_))));
}
