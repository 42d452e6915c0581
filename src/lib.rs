//! Typed client for the Firecracker API socket.
//!
//! Every endpoint is an [`Operation`](operation::Operation) carrying a table of
//! the status codes it may answer with. [`dispatch`](dispatch::dispatch) turns
//! a raw response into a [`Reply`](dispatch::Reply): either a success variant
//! or an [`ApiFailure`](dispatch::ApiFailure), with decode problems reported
//! separately as [`Error`].
use log::*;
pub mod agent;
pub mod config;
pub mod consumer;
pub mod dispatch;
mod error;
pub mod models;
pub mod operation;
pub mod ops;

pub use crate::agent::{Agent, AsyncAgent};
pub use crate::config::AgentConfig;
pub use crate::consumer::Consumers;
pub use crate::dispatch::{dispatch, ApiFailure, ClientResponse, FailureKind, Reply, Success};
pub use crate::error::{Error, Result};
pub use crate::operation::Operation;

#[doc(hidden)]
pub(crate) fn handle_entry<T: Clone>(option: &Option<T>, name: &'static str) -> Result<T> {
    option.clone().ok_or_else(|| {
        let msg = format!("Missing {name} entry");
        error!("{msg}");
        Error::Config(msg)
    })
}
