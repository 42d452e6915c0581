//! Transport to the Firecracker API socket.
//!
//! Builds HTTP/1.1 requests for operations, reads exactly one response per
//! request and hands it to the dispatcher.
pub mod async_agent;
pub mod sync_agent;

pub use async_agent::AsyncAgent;
pub use sync_agent::Agent;

use std::io::{Cursor, Read};

use crate::dispatch::ClientResponse;
use crate::operation::{Method, Operation};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Bad HTTP request: {0}")]
    BadRequest(String),
    #[error("Bad HTTP response: {0}")]
    BadResponse(String),
    #[error("Bad unix socket: {0}")]
    BadUnixSocket(String),
    #[error("Bad lock file: {0}")]
    BadLockFile(String),
    #[error("No response within {0} ms")]
    Timeout(u128),
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;

// 1024 bytes are enough for firecracker response headers
pub(crate) const MAX_BUFFER_SIZE: usize = 1024;

// largest body accepted from the socket
pub(crate) const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

const MAX_HEADERS: usize = 64;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, path: String, body: Option<String>) -> Self {
        let mut headers = vec![
            ("Host".to_string(), "localhost".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(body) = &body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            headers.push(("Content-Length".to_string(), body.len().to_string()));
        }
        HttpRequest {
            method,
            path,
            headers,
            body,
        }
    }

    pub fn from_operation<O: Operation>(op: &O) -> crate::Result<Self> {
        Ok(Self::new(O::DESCRIPTOR.method, op.path(), op.body()?))
    }
}

pub fn serialize_request(request: &HttpRequest) -> String {
    // method uri version
    let mut request_str = format!("{} {} HTTP/1.1\r\n", request.method, request.path);

    for (key, value) in &request.headers {
        request_str.push_str(&format!("{}: {}\r\n", key, value));
    }

    // empty line splitting headers and body
    request_str.push_str("\r\n");

    if let Some(body) = &request.body {
        request_str.push_str(body);
    }

    request_str
}

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub(crate) code: u16,
    pub(crate) message: String,
    pub(crate) headers: Vec<(String, String)>,
    /// Bytes taken by the status line, the headers and the empty line.
    pub(crate) len: usize,
    pub(crate) content_length: usize,
}

impl ResponseHead {
    /// Offset right after the body.
    pub(crate) fn end(&self) -> AgentResult<usize> {
        self.len.checked_add(self.content_length).ok_or_else(|| {
            AgentError::BadResponse(format!("Content-Length {} overflows", self.content_length))
        })
    }
}

/// Parses the response head out of `buf`. `Ok(None)` means more bytes are needed.
pub(crate) fn parse_head(buf: &[u8]) -> AgentResult<Option<ResponseHead>> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut res = httparse::Response::new(&mut headers);

    let len = match res.parse(buf) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => return Ok(None),
        Err(e) => return Err(AgentError::BadResponse(format!("malformed response head: {e}"))),
    };

    let code = res
        .code
        .ok_or_else(|| AgentError::BadResponse("missing status code".into()))?;
    let message = res.reason.unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut parsed = Vec::with_capacity(res.headers.len());
    for header in res.headers.iter() {
        let value = std::str::from_utf8(header.value)
            .map_err(|_| {
                AgentError::BadResponse(format!("header {} is not valid UTF-8", header.name))
            })?
            .trim()
            .to_string();
        if header.name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|_| {
                AgentError::BadResponse(format!("bad Content-Length value {value:?}"))
            })?;
            if content_length > MAX_BODY_SIZE {
                let msg = format!("Content-Length {content_length} exceeds {MAX_BODY_SIZE} bytes");
                log::error!("{msg}");
                return Err(AgentError::BadResponse(msg));
            }
        }
        parsed.push((header.name.to_string(), value));
    }

    Ok(Some(ResponseHead {
        code,
        message,
        headers: parsed,
        len,
        content_length,
    }))
}

/// A response read off the socket, with its body buffered.
#[derive(Debug)]
pub struct RawResponse {
    code: u16,
    message: String,
    headers: Vec<(String, String)>,
    body: Cursor<Vec<u8>>,
}

impl RawResponse {
    pub(crate) fn new(head: ResponseHead, body: Vec<u8>) -> Self {
        Self {
            code: head.code,
            message: head.message,
            headers: head.headers,
            body: Cursor::new(body),
        }
    }

    /// Parses a complete response held in memory.
    pub fn parse(bytes: &[u8]) -> AgentResult<Self> {
        let head = parse_head(bytes)?
            .ok_or_else(|| AgentError::BadResponse("incomplete response head".into()))?;
        let end = head.end()?;
        if bytes.len() < end {
            return Err(AgentError::BadResponse(format!(
                "expected {} body bytes, got {}",
                head.content_length,
                bytes.len() - head.len
            )));
        }
        let body = bytes[head.len..end].to_vec();
        Ok(Self::new(head, body))
    }
}

impl ClientResponse for RawResponse {
    fn code(&self) -> u16 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn body(&mut self) -> &mut dyn Read {
        &mut self.body
    }
}

/// Bytes of the next response still missing from `buf`, once its head is known.
pub(crate) fn missing_body(head: &ResponseHead, buf: &[u8]) -> AgentResult<usize> {
    Ok(head.end()?.saturating_sub(buf.len()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::{Drive, Empty};
    use crate::ops::{DescribeInstance, PutGuestDriveById};

    #[test]
    fn test_request_without_body() {
        let request = HttpRequest::from_operation(&DescribeInstance::new()).unwrap();
        let serialized_request = serialize_request(&request);
        assert_eq!(
            serialized_request,
            "GET / HTTP/1.1\r\nHost: localhost\r\nAccept: application/json\r\n\r\n"
        );

        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let result = req.parse(serialized_request.as_bytes()).unwrap();
        assert!(result.is_complete());
    }

    #[test]
    fn test_request_with_body() {
        let op = PutGuestDriveById::new(Drive::virtio("rootfs", "/rootfs.ext4", true, false));
        let serialized_request = serialize_request(&HttpRequest::from_operation(&op).unwrap());
        let body = r#"{"drive_id":"rootfs","is_root_device":true,"is_read_only":false,"path_on_host":"/rootfs.ext4"}"#;

        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let result = req.parse(serialized_request.as_bytes()).unwrap();
        assert!(result.is_complete());
        assert_eq!(req.method, Some("PUT"));
        assert_eq!(req.path, Some("/drives/rootfs"));

        let content_length = req
            .headers
            .iter()
            .find(|h| h.name == "Content-Length")
            .map(|h| std::str::from_utf8(h.value).unwrap().parse::<usize>().unwrap());
        assert_eq!(content_length, Some(body.len()));
        assert_eq!(&serialized_request[result.unwrap()..], body);
    }

    #[test]
    fn test_parse_head_partial() {
        assert_eq!(parse_head(b"HTTP/1.1 204 No Content\r\n").unwrap(), None);
        assert!(parse_head(b"NOT HTTP\r\n\r\n").is_err());
    }

    #[test]
    fn test_parse_no_content() {
        let mut res = RawResponse::parse(b"HTTP/1.1 204 \r\nServer: Firecracker API\r\n\r\n").unwrap();
        assert_eq!(res.code(), 204);
        assert_eq!(res.header("server"), Some("Firecracker API"));
        let mut body = Vec::new();
        res.body().read_to_end(&mut body).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_parse_with_body() {
        let raw = b"HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: 26\r\n\r\n{\"fault_message\":\"bad id\"}";
        let mut res = RawResponse::parse(raw).unwrap();
        assert_eq!(res.code(), 400);
        assert_eq!(res.message(), "Bad Request");
        assert_eq!(res.header("CONTENT-TYPE"), Some("application/json"));
        let mut body = String::new();
        res.body().read_to_string(&mut body).unwrap();
        assert_eq!(body, r#"{"fault_message":"bad id"}"#);
    }

    #[test]
    fn test_parse_short_body() {
        let raw = b"HTTP/1.1 400 Bad Request\r\nContent-Length: 26\r\n\r\n{\"fault";
        assert!(matches!(RawResponse::parse(raw), Err(AgentError::BadResponse(_))));

        let raw = b"HTTP/1.1 400 Bad Request\r\nContent-Length: many\r\n\r\n";
        assert!(matches!(RawResponse::parse(raw), Err(AgentError::BadResponse(_))));
    }

    #[test]
    fn test_oversized_content_length() {
        let raw = b"HTTP/1.1 400 Bad Request\r\nContent-Length: 18446744073709551615\r\n\r\n{}";
        assert!(matches!(RawResponse::parse(raw), Err(AgentError::BadResponse(_))));

        let raw = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{{}}",
            MAX_BODY_SIZE + 1
        );
        assert!(matches!(
            parse_head(raw.as_bytes()),
            Err(AgentError::BadResponse(_))
        ));

        let raw = format!("HTTP/1.1 200 OK\r\nContent-Length: {MAX_BODY_SIZE}\r\n\r\n");
        let head = parse_head(raw.as_bytes()).unwrap().unwrap();
        assert_eq!(head.end().unwrap(), raw.len() + MAX_BODY_SIZE);
        assert_eq!(missing_body(&head, raw.as_bytes()).unwrap(), MAX_BODY_SIZE);
    }

    #[test]
    fn test_end_overflow() {
        let head = ResponseHead {
            code: 200,
            message: "OK".into(),
            headers: Vec::new(),
            len: 38,
            content_length: usize::MAX,
        };
        assert!(matches!(head.end(), Err(AgentError::BadResponse(_))));
        assert!(missing_body(&head, b"").is_err());
    }

    #[test]
    fn test_raw_response_dispatch() {
        let raw = b"HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: 26\r\n\r\n{\"fault_message\":\"bad id\"}";
        let res = RawResponse::parse(raw).unwrap();
        let reply = crate::dispatch::dispatch::<PutGuestDriveById, _>(
            res,
            &crate::consumer::Consumers::default(),
        )
        .unwrap();
        assert_eq!(reply.err().unwrap().fault_message(), "bad id");
        let _: Option<&crate::dispatch::Success<Empty>> = reply.succ();
    }
}
