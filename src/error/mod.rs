use crate::agent::AgentError;
use crate::consumer::DecodeError;
use crate::dispatch::ApiFailure;
use std::io;

/// Errors in fcapi
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Firecracker answered, and the answer is a failure.
    #[error("Firecracker: {0}")]
    Api(Box<ApiFailure>),
    /// The response body could not be turned into the expected shape.
    #[error("Fail to decode payload: {0}")]
    Decode(#[from] DecodeError),
    #[error("Fail to encode request: {0}")]
    Encode(String),
    #[error("Agent: {0}")]
    Agent(#[from] AgentError),
    #[error("Configure: {0}")]
    Config(String),
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// The failure Firecracker reported, if this error carries one.
    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            Error::Api(failure) => Some(failure.as_ref()),
            _ => None,
        }
    }
}

impl From<ApiFailure> for Error {
    fn from(failure: ApiFailure) -> Self {
        Error::Api(Box::new(failure))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
