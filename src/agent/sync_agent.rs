use super::{
    missing_body, parse_head, serialize_request, AgentError, AgentResult, HttpRequest,
    RawResponse, MAX_BUFFER_SIZE,
};
use crate::config::AgentConfig;
use crate::consumer::Consumers;
use crate::dispatch::{dispatch, Reply};
use crate::operation::Operation;
use crate::Result;
use fslock::LockFile;
use log::*;
use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

/// Blocking connection to one Firecracker API socket.
///
/// Every exchange holds the lock file, so several agents (or processes)
/// sharing a socket never interleave requests.
///
/// A failed exchange (timeout, broken or malformed response) drops the
/// connection, so a late answer can never be read as the reply to the next
/// request. The next exchange connects again.
pub struct Agent {
    stream: Option<UnixStream>,
    socket_path: Option<PathBuf>,
    lock: LockFile,
    consumers: Consumers,
    timeout: Option<Duration>,
}

impl Agent {
    pub fn connect(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let stream = connect_with_retry(config)?;
        stream.set_read_timeout(config.timeout())?;
        stream.set_write_timeout(config.timeout())?;
        let lock = LockFile::open(config.lock_path.as_path()).map_err(|e| {
            let msg = format!("Fail to open the lock file: {e}");
            error!("{msg}");
            AgentError::BadLockFile(msg)
        })?;
        Ok(Self {
            stream: Some(stream),
            socket_path: Some(config.socket_path.clone()),
            lock,
            consumers: Consumers::default(),
            timeout: config.timeout(),
        })
    }

    /// Wraps an already connected stream. Such an agent cannot reconnect, so
    /// after a failed exchange every later call fails with `BadUnixSocket`.
    pub fn from_stream_lock(stream: UnixStream, lock: LockFile) -> Self {
        Self {
            stream: Some(stream),
            socket_path: None,
            lock,
            consumers: Consumers::default(),
            timeout: None,
        }
    }

    /// Replaces the default JSON/text consumers.
    pub fn with_consumers(mut self, consumers: Consumers) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.lock.owns_lock()
    }

    fn lock(&mut self) -> AgentResult<()> {
        self.lock.lock().map_err(|e| {
            let msg = format!("When locking the lock file: {e}");
            error!("{msg}");
            AgentError::BadLockFile(msg)
        })
    }

    fn unlock(&mut self) -> AgentResult<()> {
        self.lock.unlock().map_err(|e| {
            let msg = format!("When unlocking the lock file: {e}");
            error!("{msg}");
            AgentError::BadLockFile(msg)
        })
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn reconnect(&mut self) -> AgentResult<()> {
        let Some(path) = &self.socket_path else {
            let msg = "Connection dropped after a failed exchange";
            error!("{msg}");
            return Err(AgentError::BadUnixSocket(msg.into()));
        };
        debug!("Reconnecting to {}", path.display());
        let map_err = |e: std::io::Error| {
            let msg = format!("Fail to reconnect to {}: {e}", path.display());
            error!("{msg}");
            AgentError::BadUnixSocket(msg)
        };
        let stream = UnixStream::connect(path).map_err(map_err)?;
        stream.set_read_timeout(self.timeout).map_err(map_err)?;
        stream.set_write_timeout(self.timeout).map_err(map_err)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn stream(&mut self) -> AgentResult<&mut UnixStream> {
        if self.stream.is_none() {
            self.reconnect()?;
        }
        self.stream
            .as_mut()
            .ok_or_else(|| AgentError::BadUnixSocket("Not connected".into()))
    }

    fn send_request(&mut self, request: &str) -> AgentResult<()> {
        debug_assert!(self.is_locked());
        let stream = self.stream()?;

        stream.write_all(request.as_bytes()).map_err(|e| {
            let msg = format!("When writing to the socket stream: {e}");
            error!("{msg}");
            AgentError::BadRequest(msg)
        })?;

        stream.flush().map_err(|e| {
            let msg = format!("When flushing the socket stream: {e}");
            error!("{msg}");
            AgentError::BadRequest(msg)
        })
    }

    fn read_some(&mut self, buf: &mut Vec<u8>) -> AgentResult<()> {
        let mut chunk = [0u8; MAX_BUFFER_SIZE];
        let timeout = self.timeout;
        let stream = self.stream()?;
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    let msg = "Socket closed before the response was complete";
                    error!("{msg}");
                    return Err(AgentError::BadResponse(msg.into()));
                }
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(ref e)
                    if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut =>
                {
                    let millis = timeout.map(|t| t.as_millis()).unwrap_or_default();
                    error!("No response from the socket within {millis} ms");
                    return Err(AgentError::Timeout(millis));
                }
                Err(e) => {
                    let msg = format!("Bad reading from the socket: {e}");
                    error!("{msg}");
                    return Err(AgentError::BadUnixSocket(msg));
                }
            }
        }
    }

    fn recv_response(&mut self) -> AgentResult<RawResponse> {
        debug_assert!(self.is_locked());
        let mut buf = Vec::with_capacity(MAX_BUFFER_SIZE);

        let head = loop {
            self.read_some(&mut buf)?;
            if let Some(head) = parse_head(&buf)? {
                break head;
            }
        };
        while missing_body(&head, &buf)? > 0 {
            self.read_some(&mut buf)?;
        }

        let end = head.end()?;
        if buf.len() > end {
            warn!("Dropping {} unexpected bytes after the response", buf.len() - end);
            buf.truncate(end);
        }
        let body = buf.split_off(head.len);
        Ok(RawResponse::new(head, body))
    }

    /// One request/response pair. The lock must be held.
    fn round_trip(&mut self, request: &str) -> AgentResult<RawResponse> {
        let res = self
            .send_request(request)
            .and_then(|_| self.recv_response());
        if res.is_err() && self.stream.take().is_some() {
            warn!("Dropping the connection after a failed exchange");
        }
        res
    }

    fn exchange(&mut self, request: &str) -> AgentResult<RawResponse> {
        self.lock()?;
        let res = self.round_trip(request);
        let unlocked = self.unlock();
        let res = res?;
        unlocked?;
        Ok(res)
    }

    /// Sends `op` and dispatches the reply.
    ///
    /// Transport and decode failures come back as `Err`; Firecracker-reported
    /// failures come back inside the [`Reply`].
    pub fn execute<O: Operation>(&mut self, op: &O) -> Result<Reply<O::Output>> {
        let request = serialize_request(&HttpRequest::from_operation(op)?);
        trace!(target: "Agent::execute", "{} {}", O::DESCRIPTOR.method, op.path());
        let response = self.exchange(&request)?;
        dispatch::<O, _>(response, &self.consumers)
    }

    /// Sends `ops` one after another under a single lock acquisition.
    /// Stops at the first transport or decode error.
    pub fn execute_all<O: Operation>(&mut self, ops: &[O]) -> Result<Vec<Reply<O::Output>>> {
        let mut requests = Vec::with_capacity(ops.len());
        for op in ops {
            requests.push(serialize_request(&HttpRequest::from_operation(op)?));
        }

        self.lock()?;
        let mut replies = Vec::with_capacity(ops.len());
        let mut outcome = Ok(());
        for request in &requests {
            let response = match self.round_trip(request) {
                Ok(response) => response,
                Err(e) => {
                    outcome = Err(e.into());
                    break;
                }
            };
            match dispatch::<O, _>(response, &self.consumers) {
                Ok(reply) => replies.push(reply),
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        self.unlock()?;
        outcome.map(|_| replies)
    }
}

fn connect_with_retry(config: &AgentConfig) -> Result<UnixStream> {
    let mut attempt = 0;
    loop {
        match UnixStream::connect(&config.socket_path) {
            Ok(stream) => return Ok(stream),
            Err(e) if attempt < config.socket_retry => {
                attempt += 1;
                debug!(
                    "Socket {} not ready ({e}), retry {attempt}/{}",
                    config.socket_path.display(),
                    config.socket_retry
                );
                std::thread::sleep(config.retry_interval());
            }
            Err(e) => {
                let msg = format!("Fail to connect to {}: {e}", config.socket_path.display());
                error!("{msg}");
                return Err(AgentError::BadUnixSocket(msg).into());
            }
        }
    }
}
