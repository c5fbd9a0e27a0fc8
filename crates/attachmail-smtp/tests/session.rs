//! End-to-end session tests against a scripted SMTP server on loopback.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use attachmail_smtp::connection::connect;
use attachmail_smtp::{Address, Client, Error};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

enum Step {
    /// Expect a command line starting with the prefix, answer with the reply.
    Reply(String, &'static str),
    /// Collect DATA lines up to the terminator, then answer.
    Data(&'static str),
}

fn reply(expect: &str, reply: &'static str) -> Step {
    Step::Reply(expect.to_string(), reply)
}

struct Transcript {
    commands: Vec<String>,
    data: String,
}

async fn scripted_server(steps: Vec<Step>) -> (u16, JoinHandle<Transcript>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (read, mut write) = socket.into_split();
        let mut reader = BufReader::new(read);
        write
            .write_all(b"220 mock.example.com ESMTP ready\r\n")
            .await
            .unwrap();

        let mut transcript = Transcript {
            commands: Vec::new(),
            data: String::new(),
        };
        for step in steps {
            match step {
                Step::Reply(expect, answer) => {
                    let mut line = String::new();
                    reader.read_line(&mut line).await.unwrap();
                    assert!(line.starts_with(&expect), "expected {expect:?}, got {line:?}");
                    transcript.commands.push(line.trim_end().to_string());
                    write.write_all(answer.as_bytes()).await.unwrap();
                }
                Step::Data(answer) => {
                    loop {
                        let mut line = String::new();
                        reader.read_line(&mut line).await.unwrap();
                        if line == ".\r\n" {
                            break;
                        }
                        transcript.data.push_str(&line);
                    }
                    write.write_all(answer.as_bytes()).await.unwrap();
                }
            }
        }
        transcript
    });

    (port, handle)
}

#[tokio::test]
async fn login_mechanism_and_submission() {
    let steps = vec![
        reply(
            "EHLO client.test",
            "250-mock.example.com\r\n250-SIZE 1000000\r\n250 AUTH LOGIN\r\n",
        ),
        reply("AUTH LOGIN", "334 VXNlcm5hbWU6\r\n"),
        reply(&STANDARD.encode("user@example.com"), "334 UGFzc3dvcmQ6\r\n"),
        reply(&STANDARD.encode("s3cret"), "235 2.7.0 Accepted\r\n"),
        reply("MAIL FROM:<user@example.com> SIZE=", "250 OK\r\n"),
        reply("RCPT TO:<friend@example.org>", "250 OK\r\n"),
        reply("DATA", "354 Go ahead\r\n"),
        Step::Data("250 2.0.0 queued\r\n"),
        reply("QUIT", "221 Bye\r\n"),
    ];
    let (port, server) = scripted_server(steps).await;

    let stream = connect("127.0.0.1", port).await.unwrap();
    let client = Client::from_stream(stream).await.unwrap();
    assert_eq!(client.server_info().hostname, "mock.example.com");

    let client = client.ehlo("client.test").await.unwrap();
    assert_eq!(client.server_info().max_message_size(), Some(1_000_000));
    assert!(!client.is_tls());

    let mut client = client.login("user@example.com", "s3cret").await.unwrap();
    let from = Address::new("user@example.com").unwrap();
    let to = Address::new("friend@example.org").unwrap();
    client
        .send_mail(&from, &[to], b"Subject: hi\n\n.leading dot\nbye\n")
        .await
        .unwrap();
    client.quit().await.unwrap();

    let transcript = server.await.unwrap();
    assert_eq!(transcript.data, "Subject: hi\r\n\r\n..leading dot\r\nbye\r\n");
    assert_eq!(transcript.commands.len(), 8);
}

#[tokio::test]
async fn helo_fallback_then_plain_auth() {
    let plain = STANDARD.encode("\0user@example.com\0pw");
    let steps = vec![
        reply("EHLO", "502 5.5.1 Unrecognized command\r\n"),
        reply("HELO client.test", "250 mock.example.com\r\n"),
        reply(&format!("AUTH PLAIN {plain}"), "235 OK\r\n"),
        reply("QUIT", "221 Bye\r\n"),
    ];
    let (port, server) = scripted_server(steps).await;

    let stream = connect("127.0.0.1", port).await.unwrap();
    let client = Client::from_stream(stream).await.unwrap();
    let client = client.ehlo("client.test").await.unwrap();
    assert!(client.server_info().extensions.is_empty());

    let client = client.login("user@example.com", "pw").await.unwrap();
    client.quit().await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_are_permanent_errors() {
    let steps = vec![
        reply("EHLO", "250-mock.example.com\r\n250 AUTH PLAIN LOGIN\r\n"),
        reply("AUTH PLAIN", "535 5.7.8 Authentication credentials invalid\r\n"),
        reply("QUIT", "221 Bye\r\n"),
    ];
    let (port, server) = scripted_server(steps).await;

    let stream = connect("127.0.0.1", port).await.unwrap();
    let client = Client::from_stream(stream).await.unwrap();
    let client = client.ehlo("client.test").await.unwrap();
    let err = client.login("user@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, Error::Smtp { code: 535, .. }));
    assert!(err.is_permanent());
    let transcript = server.await.unwrap();
    assert_eq!(transcript.commands.last().map(String::as_str), Some("QUIT"));
}

#[tokio::test]
async fn starttls_requires_advertisement() {
    let steps = vec![
        reply("EHLO", "250-mock.example.com\r\n250 AUTH PLAIN\r\n"),
        reply("QUIT", "221 Bye\r\n"),
    ];
    let (port, server) = scripted_server(steps).await;

    let stream = connect("127.0.0.1", port).await.unwrap();
    let client = Client::from_stream(stream).await.unwrap();
    let client = client.ehlo("client.test").await.unwrap();
    let err = client.starttls("mock.example.com", "client.test").await.unwrap_err();

    assert!(matches!(err, Error::NotSupported(_)));
    let transcript = server.await.unwrap();
    assert_eq!(transcript.commands, vec!["EHLO client.test", "QUIT"]);
}
