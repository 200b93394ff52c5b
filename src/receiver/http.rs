//! Minimal HTTP/1.1 framing for the callback endpoint.

use std::collections::HashMap;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const MAX_REQUEST_BYTES: usize = 1024 * 1024;

pub(super) struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

pub(super) struct HttpReadError {
    pub status: u16,
    pub message: String,
}

impl HttpReadError {
    fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub(super) async fn read_http_request(
    socket: &mut TcpStream,
) -> Result<HttpRequest, HttpReadError> {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| HttpReadError::new(400, format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(HttpReadError::new(400, "Empty request"));
        }
        buffer.extend_from_slice(chunk.get(..bytes).unwrap_or_default());
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(HttpReadError::new(413, "Request too large"));
        }
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
    };

    let header_text = std::str::from_utf8(buffer.get(..header_end).unwrap_or_default())
        .map_err(|err| HttpReadError::new(400, format!("Invalid request encoding: {}", err)))?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| HttpReadError::new(400, "Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| HttpReadError::new(400, "Missing HTTP method"))?
        .to_owned();
    let path = parts
        .next()
        .ok_or_else(|| HttpReadError::new(400, "Missing request path"))?
        .to_owned();

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(HttpReadError::new(400, "Malformed header"));
        };
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    let content_length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Err(HttpReadError::new(413, "Request body too large"));
    }

    let body_start = header_end.saturating_add(4);
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| HttpReadError::new(400, format!("Failed to read body: {}", err)))?;
        if bytes == 0 {
            break;
        }
        body.extend_from_slice(chunk.get(..bytes).unwrap_or_default());
    }
    body.truncate(content_length);

    Ok(HttpRequest { method, path, body })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        _ => "OK",
    }
}

pub(super) async fn write_ack_response(socket: &mut TcpStream) -> Result<(), String> {
    write_response(socket, 200, br#"{"status":"received"}"#).await
}

pub(super) async fn write_error_response(
    socket: &mut TcpStream,
    status: u16,
    message: &str,
) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct ErrorResponse<'msg> {
        error: &'msg str,
    }
    let body = serde_json::to_vec(&ErrorResponse { error: message })
        .map_err(|err| format!("Failed to encode error: {}", err))?;
    write_response(socket, status, &body).await
}

async fn write_response(socket: &mut TcpStream, status: u16, body: &[u8]) -> Result<(), String> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        status_text(status),
        body.len()
    );
    socket
        .write_all(head.as_bytes())
        .await
        .map_err(|err| format!("Failed to write response: {}", err))?;
    socket
        .write_all(body)
        .await
        .map_err(|err| format!("Failed to write response body: {}", err))
}
