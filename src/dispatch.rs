//! Turns a completed response into the typed outcome of one operation.
use either::Either;
use log::*;
use serde::de::DeserializeOwned;
use std::fmt;
use std::io::Read;

use crate::consumer::{Consumers, DecodeError};
use crate::models::ApiError;
use crate::operation::{Descriptor, Expect, Operation};
use crate::Result;

/// A response as delivered by the transport.
///
/// The body is a single-pass stream. [`dispatch`] takes the response by value,
/// so the stream is dropped on every path out of it.
pub trait ClientResponse {
    fn code(&self) -> u16;
    fn message(&self) -> &str;
    /// Header lookup, case-insensitive on the name.
    fn header(&self, name: &str) -> Option<&str>;
    fn body(&mut self) -> &mut dyn Read;
}

/// Successful outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Success<T> {
    /// Body-less success, e.g. 204.
    NoContent,
    /// Success with a body. `None` when the server sent an empty one.
    Ok(Option<T>),
    /// A 2xx code the operation does not list.
    Default { code: u16, payload: Option<ApiError> },
}

impl<T> Success<T> {
    pub fn payload(&self) -> Option<&T> {
        match self {
            Success::Ok(payload) => payload.as_ref(),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            Success::Ok(payload) => payload,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A failure code the operation lists, with its label.
    Fault(&'static str),
    /// Reached through the default entry with a non-2xx code.
    Default,
    /// The operation has no default entry and the code is not listed.
    Unknown,
}

/// Failed outcome of an operation, as reported by Firecracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    operation: &'static Descriptor,
    code: u16,
    kind: FailureKind,
    payload: Option<ApiError>,
}

impl ApiFailure {
    pub fn new(
        operation: &'static Descriptor,
        code: u16,
        kind: FailureKind,
        payload: Option<ApiError>,
    ) -> Self {
        Self {
            operation,
            code,
            kind,
            payload,
        }
    }

    pub fn operation(&self) -> &'static Descriptor {
        self.operation
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn payload(&self) -> Option<&ApiError> {
        self.payload.as_ref()
    }

    /// The fault message, empty when no payload came with the failure.
    pub fn fault_message(&self) -> &str {
        self.payload
            .as_ref()
            .map(|p| p.fault_message.as_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operation;
        write!(f, "[{} {}][{}] ", op.method, op.path, self.code)?;
        match self.kind {
            FailureKind::Fault(label) => write!(f, "{}{label} ", variant_prefix(op.id))?,
            FailureKind::Default => write!(f, "{} default ", op.id)?,
            FailureKind::Unknown => write!(f, "{} unknown response status ", op.id)?,
        }
        if let Some(payload) = &self.payload {
            write!(f, " {payload}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiFailure {}

// Variant names camel-case acronyms: "putGuestDriveByID" -> "putGuestDriveById".
fn variant_prefix(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let mut prefix = String::with_capacity(id.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
        let next_lower = chars.get(i + 1).map_or(false, |n| n.is_ascii_lowercase());
        if c.is_ascii_uppercase() && prev_upper && !next_lower {
            prefix.push(c.to_ascii_lowercase());
        } else {
            prefix.push(c);
        }
    }
    prefix
}

/// Exactly one of success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Reply<T>(pub Either<Success<T>, ApiFailure>);

impl<T> Reply<T> {
    #[inline]
    pub fn is_succ(&self) -> bool {
        self.0.is_left()
    }

    #[inline]
    pub fn is_err(&self) -> bool {
        self.0.is_right()
    }

    #[inline]
    pub fn succ(&self) -> Option<&Success<T>> {
        self.0.as_ref().left()
    }

    #[inline]
    pub fn err(&self) -> Option<&ApiFailure> {
        self.0.as_ref().right()
    }

    /// Folds the failure side into [`Error::Api`](crate::Error::Api).
    pub fn into_result(self) -> Result<Success<T>> {
        match self.0 {
            Either::Left(success) => Ok(success),
            Either::Right(failure) => Err(failure.into()),
        }
    }
}

/// Dispatches `response` against the response table of `O`.
///
/// Status codes select the variant; bodies are only read for variants that
/// carry a payload. A malformed body aborts with [`Error::Decode`](crate::Error::Decode)
/// and no variant is produced.
pub fn dispatch<O, R>(response: R, consumers: &Consumers) -> Result<Reply<O::Output>>
where
    O: Operation,
    R: ClientResponse,
{
    dispatch_with(O::DESCRIPTOR, response, consumers)
}

/// [`dispatch`] for callers that hold the descriptor rather than the operation type.
pub fn dispatch_with<T, R>(
    descriptor: &'static Descriptor,
    mut response: R,
    consumers: &Consumers,
) -> Result<Reply<T>>
where
    T: DeserializeOwned,
    R: ClientResponse,
{
    let code = response.code();
    let expect = descriptor.lookup(code).copied();
    trace!(target: "dispatch", "{} {}: status {} matched {:?}", descriptor.method, descriptor.id, code, expect);

    let reply = match expect {
        Some(Expect::NoContent(_)) => Either::Left(Success::NoContent),
        Some(Expect::Output(_)) => Either::Left(Success::Ok(read_payload(&mut response, consumers)?)),
        Some(Expect::Fault(_, label)) => {
            let payload = read_payload(&mut response, consumers)?;
            Either::Right(ApiFailure::new(descriptor, code, FailureKind::Fault(label), payload))
        }
        Some(Expect::Default) => {
            let payload = read_payload(&mut response, consumers)?;
            if code / 100 == 2 {
                Either::Left(Success::Default { code, payload })
            } else {
                Either::Right(ApiFailure::new(descriptor, code, FailureKind::Default, payload))
            }
        }
        None => Either::Right(ApiFailure::new(descriptor, code, FailureKind::Unknown, None)),
    };

    if let Either::Right(failure) = &reply {
        debug!(target: "dispatch", "{failure}");
    }
    Ok(Reply(reply))
}

fn read_payload<P, R>(response: &mut R, consumers: &Consumers) -> Result<Option<P>>
where
    P: DeserializeOwned,
    R: ClientResponse,
{
    let consumer = consumers.get(response.header("content-type"))?;
    let value = consumer.consume(response.body()).map_err(|e| {
        error!(target: "dispatch", "Fail to read response body: {e}");
        e
    })?;
    match value {
        None => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
            error!(target: "dispatch", "Response body does not match the expected shape: {e}");
            DecodeError::Json(e).into()
        }),
    }
}
