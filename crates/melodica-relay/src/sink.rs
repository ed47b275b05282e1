//! The serial and HTTP sinks and their wire formats.
//!
//! Both sinks are dumb transports: they deliver one note and report how it
//! went. Deadlines and outcome classification live in [`crate::relay`].

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use melodica_game::Note;

/// Error from a single sink delivery attempt.
///
/// Never escapes the relay layer; converted to a
/// [`RelayOutcome`](crate::RelayOutcome) before the caller sees it.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Connection or read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bridge endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// The endpoint's response did not look like HTTP.
    #[error("malformed HTTP response")]
    MalformedResponse,
}

/// JSON body of a relayed note, shared by the HTTP sink and the bridge
/// server: `{"note":"E"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    /// The note symbol being relayed.
    pub note: Note,
}

/// Wire framing the controller firmware expects on the serial line.
pub fn serial_frame(note: Note) -> String {
    format!("PLAY_NOTE_{}\n", note)
}

/// Sink over a caller-managed serial connection.
///
/// The session never opens or closes the device; whoever owns the round
/// opens the port for its lifetime and passes the writer in. Any async
/// writer works, which is also what the tests rely on.
pub struct SerialSink {
    writer: Box<dyn AsyncWrite + Send + Unpin>,
}

impl SerialSink {
    /// Wraps an already-open serial writer.
    pub fn new(writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        SerialSink {
            writer: Box::new(writer),
        }
    }

    /// Writes one framed note and flushes.
    pub async fn send(&mut self, note: Note) -> Result<(), SinkError> {
        self.writer.write_all(serial_frame(note).as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl std::fmt::Debug for SerialSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSink").finish_non_exhaustive()
    }
}

/// Sink over the local HTTP bridge: `POST /send-note` with a JSON body.
///
/// One short-lived connection per note. The bridge protocol is a single
/// fixed route, so the sink speaks minimal HTTP/1.1 directly over a
/// `TcpStream` rather than pulling in a client stack.
#[derive(Debug, Clone)]
pub struct HttpSink {
    addr: SocketAddr,
}

impl HttpSink {
    /// Creates a sink targeting the bridge endpoint at `addr`.
    pub fn new(addr: SocketAddr) -> Self {
        HttpSink { addr }
    }

    /// The configured endpoint address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Posts one note and waits for the response status line.
    pub async fn send(&self, note: Note) -> Result<(), SinkError> {
        let body = serde_json::to_string(&NotePayload { note })
            .expect("note payload serialization cannot fail");
        let request = format!(
            "POST /send-note HTTP/1.1\r\n\
             Host: {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            self.addr,
            body.len(),
            body
        );

        let mut stream = TcpStream::connect(self.addr).await?;
        stream.write_all(request.as_bytes()).await?;

        let mut reader = BufReader::new(&mut stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line).await?;
        let code = parse_status_line(&status_line).ok_or(SinkError::MalformedResponse)?;

        if (200..300).contains(&code) {
            Ok(())
        } else {
            Err(SinkError::Status(code))
        }
    }
}

/// Extracts the status code from an HTTP/1.x status line.
fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_serial_frame_shape() {
        assert_eq!(serial_frame(Note::E), "PLAY_NOTE_E\n");
        assert_eq!(serial_frame(Note::A), "PLAY_NOTE_A\n");
    }

    #[test]
    fn test_note_payload_json_shape() {
        let json = serde_json::to_string(&NotePayload { note: Note::G }).unwrap();
        assert_eq!(json, r#"{"note":"G"}"#);
        let back: NotePayload = serde_json::from_str(r#"{"note":"C"}"#).unwrap();
        assert_eq!(back.note, Note::C);
    }

    #[test]
    fn test_parse_status_line() {
        assert_eq!(parse_status_line("HTTP/1.1 200 OK\r\n"), Some(200));
        assert_eq!(parse_status_line("HTTP/1.0 503 Unavailable\r\n"), Some(503));
        assert_eq!(parse_status_line("not http at all"), None);
        assert_eq!(parse_status_line(""), None);
    }

    #[tokio::test]
    async fn test_serial_sink_writes_framed_notes() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut sink = SerialSink::new(client);

        sink.send(Note::E).await.unwrap();
        sink.send(Note::G).await.unwrap();

        let mut buf = vec![0u8; 24];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"PLAY_NOTE_E\nPLAY_NOTE_G\n");
    }

    #[tokio::test]
    async fn test_http_sink_posts_note_and_accepts_200() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            // The request body is JSON, so read until the closing brace.
            loop {
                let mut chunk = [0u8; 256];
                let n = stream.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if n == 0 || buf.ends_with(b"}") {
                    break;
                }
            }
            let request = String::from_utf8_lossy(&buf).to_string();
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
            request
        });

        let sink = HttpSink::new(addr);
        sink.send(Note::E).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /send-note HTTP/1.1"));
        assert!(request.ends_with(r#"{"note":"E"}"#));
    }

    #[tokio::test]
    async fn test_http_sink_reports_error_status() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 1024];
            let _ = stream.read(&mut buf).await.unwrap();
            stream
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
        });

        let sink = HttpSink::new(addr);
        match sink.send(Note::E).await {
            Err(SinkError::Status(503)) => {}
            other => panic!("expected HTTP 503 error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_sink_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = HttpSink::new(addr);
        match sink.send(Note::E).await {
            Err(SinkError::Io(_)) => {}
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
