//! Request handling for the serial bridge server.
//!
//! The bridge speaks just enough HTTP/1.1 for its single route: read one
//! request, answer with a JSON body, close the connection. Anything that
//! goes wrong becomes a JSON error response; the server itself never falls
//! over because of one bad request or a missing board.

use tokio::io::{AsyncBufReadExt, AsyncReadExt};
use tokio::sync::Mutex;

use melodica_relay::{NotePayload, SerialSink};

use super::types::{SendAck, SendError};

/// Cap on accepted request bodies; note payloads are tiny.
const MAX_BODY_BYTES: usize = 4096;

/// A parsed incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method (`POST`).
    pub method: String,
    /// Request path (`/send-note`).
    pub path: String,
    /// Raw request body.
    pub body: Vec<u8>,
}

/// A response ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: String,
}

impl HttpResponse {
    fn json(status: u16, body: impl serde::Serialize) -> Self {
        HttpResponse {
            status,
            body: serde_json::to_string(&body).expect("response body serialization cannot fail"),
        }
    }

    /// Renders the full wire form, headers included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let reason = match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            503 => "Service Unavailable",
            _ => "Internal Server Error",
        };
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            self.status,
            reason,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Reads one HTTP request (line, headers, body) from `reader`.
///
/// Returns `None` when the peer closed the connection before sending a
/// request line.
pub async fn read_request<R>(reader: &mut R) -> std::io::Result<Option<HttpRequest>>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(None);
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    // Headers: only Content-Length matters for this route.
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line
            .split_once(':')
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.trim())
        {
            content_length = value.parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length.min(MAX_BODY_BYTES)];
    reader.read_exact(&mut body).await?;

    Ok(Some(HttpRequest { method, path, body }))
}

/// Routes one request against the (possibly absent) serial connection.
pub async fn process(request: &HttpRequest, serial: Option<&Mutex<SerialSink>>) -> HttpResponse {
    if request.method != "POST" || request.path != "/send-note" {
        return HttpResponse::json(404, SendError::new("not found"));
    }

    let payload: NotePayload = match serde_json::from_slice(&request.body) {
        Ok(payload) => payload,
        Err(err) => {
            return HttpResponse::json(400, SendError::new(format!("invalid note payload: {}", err)))
        }
    };

    let Some(serial) = serial else {
        return HttpResponse::json(503, SendError::new("Serial connection not established."));
    };

    match serial.lock().await.send(payload.note).await {
        Ok(()) => HttpResponse::json(200, SendAck::new(payload.note.symbol())),
        Err(err) => HttpResponse::json(500, SendError::new(err.to_string())),
    }
}
