// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structured HTTP response and raw-buffer parser
//!
//! The transport hands back one opaque buffer. When header capture is on,
//! that buffer can contain several back-to-back response blocks (interim
//! `100 Continue`, redirect hops) ahead of the terminal one; the parser
//! unwraps them until it reaches the real response.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Status codes whose block is followed by the real response in the same buffer
const INTERIM_STATUSES: [&str; 4] = ["100", "301", "302", "303"];

/// Upper bound on chained-block unwrapping; a well-formed transport never gets close
const MAX_CHAINED_RESPONSES: usize = 16;

/// HTTP response representation, immutable once constructed
///
/// Exactly one of two shapes holds: a transport failure (`is_error()`) or
/// a parsed result whose population depends on which constructor path the
/// session took (full parse, body only, or URL only).
#[derive(Debug, Clone)]
pub struct Response {
    url: String,
    http_version: Option<String>,
    status: Option<String>,
    reason: Option<String>,
    headers: Vec<String>,
    body: Option<Bytes>,
    error: Option<String>,
}

impl Response {
    /// Build an error-flagged response from a transport failure
    pub fn from_error(url: impl Into<String>, error: impl Into<String>) -> Response {
        Response {
            error: Some(error.into()),
            ..Response::empty(url)
        }
    }

    /// Build a URL-only response (body was streamed elsewhere, not captured)
    pub fn from_url(url: impl Into<String>) -> Response {
        Response::empty(url)
    }

    /// Build a body-only response (header capture was off)
    pub fn from_body(url: impl Into<String>, body: impl Into<Bytes>) -> Response {
        Response {
            body: Some(body.into()),
            ..Response::empty(url)
        }
    }

    /// Parse a raw buffer of status line + headers + body
    ///
    /// Interim blocks (`100`, and redirect codes when the transport was
    /// told to include every hop's headers) are unwrapped until a terminal
    /// block is found, bounded by [`MAX_CHAINED_RESPONSES`].
    pub fn from_raw(url: impl Into<String>, buffer: &[u8]) -> Response {
        let mut parts = RawParts::parse(buffer);

        let mut hops = 0;
        while parts.is_interim() {
            if hops >= MAX_CHAINED_RESPONSES {
                tracing::warn!(
                    hops,
                    "chained-response unwrap cap reached, keeping interim block"
                );
                break;
            }
            hops += 1;
            parts = RawParts::parse(&parts.body);
        }

        Response {
            http_version: parts.version,
            status: parts.status,
            reason: parts.reason,
            headers: parts.headers,
            body: Some(parts.body),
            ..Response::empty(url)
        }
    }

    fn empty(url: impl Into<String>) -> Response {
        Response {
            url: url.into(),
            http_version: None,
            status: None,
            reason: None,
            headers: Vec::new(),
            body: None,
            error: None,
        }
    }

    /// The request URL this response answers
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP protocol version token, e.g. `HTTP/1.1`
    pub fn http_version(&self) -> Option<&str> {
        self.http_version.as_deref()
    }

    /// Status code as a string, e.g. `"200"`
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Reason phrase, e.g. `"Not Found"`
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Raw header lines as received
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Header lines split into name/value pairs
    ///
    /// Names are kept as received, not normalized. A line without a `": "`
    /// separator yields an empty value.
    pub fn headers_map(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|line| match line.split_once(": ") {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (line.clone(), String::new()),
            })
            .collect()
    }

    /// Response body bytes, if captured
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Transport error text, if the call failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the transport reported a failure
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the call succeeded
    ///
    /// True when no transport failure occurred and the status is `200` or
    /// absent (body-only and URL-only construction paths carry no status).
    pub fn is_ok(&self) -> bool {
        !self.is_error() && matches!(self.status.as_deref(), Some("200") | None)
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> Result<String> {
        let body = self.body.as_ref().ok_or_else(|| Error::other("response has no body"))?;
        String::from_utf8(body.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }

    /// Body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.as_ref().ok_or_else(|| Error::other("response has no body"))?;
        serde_json::from_slice(body).map_err(Error::from)
    }
}

/// One parsed response block
struct RawParts {
    version: Option<String>,
    status: Option<String>,
    reason: Option<String>,
    headers: Vec<String>,
    body: Bytes,
}

impl RawParts {
    /// Split a buffer into status line, header lines and body
    ///
    /// The header block ends at the first blank line; without one the
    /// whole buffer is treated as headers and the body is empty.
    fn parse(buffer: &[u8]) -> RawParts {
        let (head, body) = match find_blank_line(buffer) {
            Some(idx) => (&buffer[..idx], &buffer[idx + 4..]),
            None => (buffer, &[][..]),
        };

        let head = String::from_utf8_lossy(head);
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap_or("");
        let (version, status, reason) = split_status_line(status_line);

        RawParts {
            version,
            status,
            reason,
            headers: lines.map(str::to_string).collect(),
            body: Bytes::copy_from_slice(body),
        }
    }

    fn is_interim(&self) -> bool {
        self.status
            .as_deref()
            .map_or(false, |s| INTERIM_STATUSES.contains(&s))
            && !self.body.is_empty()
    }
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Split a status line into at most three whitespace-bounded tokens
///
/// The reason phrase is the unsplit remainder, so it may contain spaces.
fn split_status_line(line: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut rest = line;
    let version = next_token(&mut rest);
    let status = next_token(&mut rest);
    let reason = match rest.trim_start() {
        "" => None,
        phrase => Some(phrase.to_string()),
    };
    (version, status, reason)
}

fn next_token(rest: &mut &str) -> Option<String> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    match trimmed.find(char::is_whitespace) {
        Some(idx) => {
            *rest = &trimmed[idx..];
            Some(trimmed[..idx].to_string())
        }
        None => {
            *rest = "";
            Some(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BUFFER: &[u8] =
        b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nServer: test\r\n\r\n<html></html>";

    #[test]
    fn test_parse_full_response() {
        let resp = Response::from_raw("http://example.com/", OK_BUFFER);

        assert_eq!(resp.http_version(), Some("HTTP/1.1"));
        assert_eq!(resp.status(), Some("200"));
        assert_eq!(resp.reason(), Some("OK"));
        assert_eq!(
            resp.headers(),
            &["Content-Type: text/html".to_string(), "Server: test".to_string()]
        );
        assert_eq!(resp.text().unwrap(), "<html></html>");
        assert!(resp.is_ok());
        assert!(!resp.is_error());
    }

    #[test]
    fn test_reason_phrase_keeps_spaces() {
        let resp = Response::from_raw("u", b"HTTP/1.1 404 Not Found\r\n\r\n");
        assert_eq!(resp.status(), Some("404"));
        assert_eq!(resp.reason(), Some("Not Found"));
        assert!(!resp.is_ok());
    }

    #[test]
    fn test_chained_interim_unwrap() {
        let buffer = b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 200 OK\r\nX-Final: yes\r\n\r\nreal body";
        let resp = Response::from_raw("u", buffer);

        assert_eq!(resp.status(), Some("200"));
        assert_eq!(resp.headers(), &["X-Final: yes".to_string()]);
        assert_eq!(resp.text().unwrap(), "real body");
    }

    #[test]
    fn test_redirect_chain_unwrap() {
        let buffer = b"HTTP/1.1 301 Moved Permanently\r\nLocation: /a\r\n\r\n\
                       HTTP/1.1 302 Found\r\nLocation: /b\r\n\r\n\
                       HTTP/1.1 200 OK\r\n\r\ndone";
        let resp = Response::from_raw("u", buffer);

        assert_eq!(resp.status(), Some("200"));
        assert_eq!(resp.text().unwrap(), "done");
    }

    #[test]
    fn test_interim_with_empty_body_is_terminal() {
        let resp = Response::from_raw("u", b"HTTP/1.1 302 Found\r\nLocation: /a\r\n\r\n");
        assert_eq!(resp.status(), Some("302"));
        assert_eq!(resp.body().map(|b| b.len()), Some(0));
    }

    #[test]
    fn test_unwrap_cap() {
        let mut buffer = b"HTTP/1.1 200 OK\r\n\r\nbody".to_vec();
        for _ in 0..MAX_CHAINED_RESPONSES + 4 {
            let mut wrapped = b"HTTP/1.1 301 Moved\r\nLocation: /x\r\n\r\n".to_vec();
            wrapped.extend_from_slice(&buffer);
            buffer = wrapped;
        }

        let resp = Response::from_raw("u", &buffer);
        assert_eq!(resp.status(), Some("301"));
    }

    #[test]
    fn test_buffer_without_blank_line() {
        let resp = Response::from_raw("u", b"HTTP/1.1 200 OK\r\nX-Partial: 1");
        assert_eq!(resp.status(), Some("200"));
        assert_eq!(resp.headers(), &["X-Partial: 1".to_string()]);
        assert_eq!(resp.body().map(|b| b.len()), Some(0));
    }

    #[test]
    fn test_is_ok_matrix() {
        assert!(Response::from_raw("u", OK_BUFFER).is_ok());
        assert!(!Response::from_raw("u", b"HTTP/1.1 500 Oops\r\n\r\n").is_ok());
        // body-only and url-only paths carry no status
        assert!(Response::from_body("u", "payload").is_ok());
        assert!(Response::from_url("u").is_ok());
        assert!(!Response::from_error("u", "connect refused").is_ok());
    }

    #[test]
    fn test_error_response() {
        let resp = Response::from_error("http://down.example", "could not resolve host");

        assert!(resp.is_error());
        assert_eq!(resp.error(), Some("could not resolve host"));
        assert_eq!(resp.status(), None);
        assert_eq!(resp.body(), None);
    }

    #[test]
    fn test_headers_map() {
        let resp = Response::from_raw("u", OK_BUFFER);
        let map = resp.headers_map();

        assert_eq!(map[0], ("Content-Type".to_string(), "text/html".to_string()));
        assert_eq!(map[1], ("Server".to_string(), "test".to_string()));
    }

    #[test]
    fn test_json_body() {
        let resp = Response::from_body("u", r#"{"answer": 42}"#);
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["answer"], 42);

        let bad = Response::from_body("u", "not json");
        assert!(bad.json::<serde_json::Value>().is_err());

        let none = Response::from_url("u");
        assert!(none.json::<serde_json::Value>().is_err());
    }
}
