//! Body consumers keyed by the negotiated media type.
//!
//! A consumer turns the raw body into a JSON [`Value`]; the dispatcher then
//! converts that value into the shape the matched response variant expects.
//! A body that ends before any token, or a JSON `null`, is "no payload"
//! (`Ok(None)`), never an error.
use log::*;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("reading body: {0}")]
    Read(#[from] std::io::Error),
    #[error("no consumer registered for media type {0:?}")]
    UnsupportedMediaType(String),
}

pub trait Consumer: Send + Sync {
    fn consume(&self, body: &mut dyn Read) -> Result<Option<Value>, DecodeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConsumer;

impl Consumer for JsonConsumer {
    fn consume(&self, body: &mut dyn Read) -> Result<Option<Value>, DecodeError> {
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)?;
        if buf.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice(&buf)? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}

/// Hands the body over as a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConsumer;

impl Consumer for TextConsumer {
    fn consume(&self, body: &mut dyn Read) -> Result<Option<Value>, DecodeError> {
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)?;
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(Value::String(String::from_utf8(buf)?)))
    }
}

/// Registry of consumers, looked up by the response `Content-Type`.
pub struct Consumers {
    by_media_type: HashMap<String, Box<dyn Consumer>>,
    default_media_type: String,
}

impl Default for Consumers {
    /// JSON and plain text, with JSON used when the response names no media type.
    fn default() -> Self {
        let mut consumers = Self::empty(APPLICATION_JSON);
        consumers.register(APPLICATION_JSON, JsonConsumer);
        consumers.register(TEXT_PLAIN, TextConsumer);
        consumers
    }
}

impl Consumers {
    /// A registry without any consumer. `default_media_type` is used for
    /// responses that carry no `Content-Type` header.
    pub fn empty(default_media_type: &str) -> Self {
        Self {
            by_media_type: HashMap::new(),
            default_media_type: normalize(default_media_type),
        }
    }

    pub fn register<C: Consumer + 'static>(&mut self, media_type: &str, consumer: C) {
        self.by_media_type
            .insert(normalize(media_type), Box::new(consumer));
    }

    pub fn get(&self, content_type: Option<&str>) -> Result<&dyn Consumer, DecodeError> {
        let media_type = match content_type {
            Some(content_type) if !content_type.trim().is_empty() => normalize(content_type),
            _ => self.default_media_type.clone(),
        };
        match self.by_media_type.get(&media_type) {
            Some(consumer) => Ok(consumer.as_ref()),
            None => {
                error!(target: "Consumers::get", "no consumer for media type {media_type}");
                Err(DecodeError::UnsupportedMediaType(media_type))
            }
        }
    }
}

impl std::fmt::Debug for Consumers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut media_types: Vec<_> = self.by_media_type.keys().collect();
        media_types.sort();
        f.debug_struct("Consumers")
            .field("media_types", &media_types)
            .field("default_media_type", &self.default_media_type)
            .finish()
    }
}

// "Application/JSON; charset=utf-8" -> "application/json"
fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod test {
    use super::*;

    fn consume_json(body: &str) -> Result<Option<Value>, DecodeError> {
        JsonConsumer.consume(&mut body.as_bytes())
    }

    #[test]
    fn test_json_empty_body_is_no_payload() {
        assert!(consume_json("").unwrap().is_none());
        assert!(consume_json(" \r\n\t").unwrap().is_none());
        assert!(consume_json("null").unwrap().is_none());
    }

    #[test]
    fn test_json_truncated_body_is_an_error() {
        let err = consume_json(r#"{"fault_message":"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_json_body() {
        let value = consume_json(r#"{"fault_message":"bad id"}"#).unwrap().unwrap();
        assert_eq!(value["fault_message"], "bad id");
    }

    #[test]
    fn test_text_body() {
        let value = TextConsumer.consume(&mut "1.7.0".as_bytes()).unwrap();
        assert_eq!(value, Some(Value::String("1.7.0".into())));
        assert!(TextConsumer.consume(&mut "".as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_registry_lookup() {
        let consumers = Consumers::default();
        assert!(consumers.get(None).is_ok());
        assert!(consumers.get(Some("")).is_ok());
        assert!(consumers.get(Some("Application/JSON; charset=utf-8")).is_ok());
        assert!(consumers.get(Some("text/plain")).is_ok());
        assert!(matches!(
            consumers.get(Some("application/xml")),
            Err(DecodeError::UnsupportedMediaType(m)) if m == "application/xml"
        ));
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let consumers = Consumers::empty(APPLICATION_JSON);
        assert!(consumers.get(None).is_err());
    }
}
