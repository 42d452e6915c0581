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
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Tokio flavour of [`Agent`](super::Agent).
///
/// The lock file is taken with a blocking call, the same way the blocking
/// agent takes it. A failed exchange drops the connection and the next one
/// connects again.
pub struct AsyncAgent {
    stream: Option<UnixStream>,
    socket_path: PathBuf,
    lock: LockFile,
    consumers: Consumers,
    timeout: Option<Duration>,
}

impl AsyncAgent {
    pub async fn connect(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let stream = connect_with_retry(config).await?;
        let lock = LockFile::open(config.lock_path.as_path()).map_err(|e| {
            let msg = format!("Fail to open the lock file: {e}");
            error!("{msg}");
            AgentError::BadLockFile(msg)
        })?;
        Ok(Self {
            stream: Some(stream),
            socket_path: config.socket_path.clone(),
            lock,
            consumers: Consumers::default(),
            timeout: config.timeout(),
        })
    }

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

    async fn stream(&mut self) -> AgentResult<&mut UnixStream> {
        if self.stream.is_none() {
            debug!("Reconnecting to {}", self.socket_path.display());
            let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
                let msg = format!("Fail to reconnect to {}: {e}", self.socket_path.display());
                error!("{msg}");
                AgentError::BadUnixSocket(msg)
            })?;
            self.stream = Some(stream);
        }
        self.stream
            .as_mut()
            .ok_or_else(|| AgentError::BadUnixSocket("Not connected".into()))
    }

    async fn send_request(&mut self, request: &str) -> AgentResult<()> {
        let stream = self.stream().await?;
        stream.write_all(request.as_bytes()).await.map_err(|e| {
            let msg = format!("When writing to the socket stream: {e}");
            error!("{msg}");
            AgentError::BadRequest(msg)
        })?;
        stream.flush().await.map_err(|e| {
            let msg = format!("When flushing the socket stream: {e}");
            error!("{msg}");
            AgentError::BadRequest(msg)
        })
    }

    async fn read_some(&mut self, buf: &mut Vec<u8>) -> AgentResult<()> {
        let mut chunk = [0u8; MAX_BUFFER_SIZE];
        match self.stream().await?.read(&mut chunk).await {
            Ok(0) => {
                let msg = "Socket closed before the response was complete";
                error!("{msg}");
                Err(AgentError::BadResponse(msg.into()))
            }
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(e) => {
                let msg = format!("Bad reading from the socket: {e}");
                error!("{msg}");
                Err(AgentError::BadUnixSocket(msg))
            }
        }
    }

    async fn recv_response(&mut self) -> AgentResult<RawResponse> {
        let mut buf = Vec::with_capacity(MAX_BUFFER_SIZE);
        let head = loop {
            self.read_some(&mut buf).await?;
            if let Some(head) = parse_head(&buf)? {
                break head;
            }
        };
        while missing_body(&head, &buf)? > 0 {
            self.read_some(&mut buf).await?;
        }

        let end = head.end()?;
        if buf.len() > end {
            warn!("Dropping {} unexpected bytes after the response", buf.len() - end);
            buf.truncate(end);
        }
        let body = buf.split_off(head.len);
        Ok(RawResponse::new(head, body))
    }

    async fn round_trip(&mut self, request: &str) -> AgentResult<RawResponse> {
        let timeout = self.timeout;
        let exchange = async {
            self.send_request(request).await?;
            self.recv_response().await
        };
        let res = match timeout {
            None => exchange.await,
            Some(timeout) => match tokio::time::timeout(timeout, exchange).await {
                Ok(res) => res,
                Err(_) => {
                    error!("No response from the socket within {} ms", timeout.as_millis());
                    Err(AgentError::Timeout(timeout.as_millis()))
                }
            },
        };
        if res.is_err() && self.stream.take().is_some() {
            warn!("Dropping the connection after a failed exchange");
        }
        res
    }

    pub async fn execute<O: Operation>(&mut self, op: &O) -> Result<Reply<O::Output>> {
        let request = serialize_request(&HttpRequest::from_operation(op)?);
        trace!(target: "AsyncAgent::execute", "{} {}", O::DESCRIPTOR.method, op.path());
        self.lock()?;
        let res = self.round_trip(&request).await;
        let unlocked = self.unlock();
        let response = res?;
        unlocked?;
        dispatch::<O, _>(response, &self.consumers)
    }

    /// Sends `ops` one after another under a single lock acquisition.
    /// Stops at the first transport or decode error.
    pub async fn execute_all<O: Operation>(&mut self, ops: &[O]) -> Result<Vec<Reply<O::Output>>> {
        let mut requests = Vec::with_capacity(ops.len());
        for op in ops {
            requests.push(serialize_request(&HttpRequest::from_operation(op)?));
        }

        self.lock()?;
        let mut replies = Vec::with_capacity(ops.len());
        let mut outcome = Ok(());
        for request in &requests {
            let response = match self.round_trip(request).await {
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

async fn connect_with_retry(config: &AgentConfig) -> Result<UnixStream> {
    let mut attempt = 0;
    loop {
        match UnixStream::connect(&config.socket_path).await {
            Ok(stream) => return Ok(stream),
            Err(e) if attempt < config.socket_retry => {
                attempt += 1;
                debug!(
                    "Socket {} not ready ({e}), retry {attempt}/{}",
                    config.socket_path.display(),
                    config.socket_retry
                );
                tokio::time::sleep(config.retry_interval()).await;
            }
            Err(e) => {
                let msg = format!("Fail to connect to {}: {e}", config.socket_path.display());
                error!("{msg}");
                return Err(AgentError::BadUnixSocket(msg).into());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dispatch::{FailureKind, Success};
    use crate::models::{InstanceInfo, InstanceState};
    use crate::ops::DescribeInstance;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::UnixListener;

    fn test_config(name: &str) -> AgentConfig {
        let dir = std::env::temp_dir();
        let id = format!("fcapi_async_{}_{}", name, std::process::id());
        AgentConfig::new(dir.join(format!("{id}.sock")), dir.join(format!("{id}.lock")))
    }

    /// Reads one request head per canned response and writes the response back.
    async fn run_server(listener: UnixListener, responses: Vec<String>) {
        let (stream, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        for response in responses {
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                if line == "\r\n" {
                    break;
                }
            }
            writer.write_all(response.as_bytes()).await.unwrap();
        }
        // keep the connection open until the client is done
        let mut rest = Vec::new();
        let _ = reader.read_to_end(&mut rest).await;
    }

    fn bind(config: &AgentConfig) -> UnixListener {
        let _ = std::fs::remove_file(&config.socket_path);
        UnixListener::bind(&config.socket_path).unwrap()
    }

    #[tokio::test]
    async fn test_execute() {
        let config = test_config("execute");
        let info = InstanceInfo {
            app_name: "Firecracker".into(),
            id: "demo".into(),
            state: InstanceState::Running,
            vmm_version: "1.7.0".into(),
        };
        let body = serde_json::to_string(&info).unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let server = tokio::spawn(run_server(bind(&config), vec![response]));

        let mut agent = AsyncAgent::connect(&config).await.unwrap();
        let reply = agent.execute(&DescribeInstance::new()).await.unwrap();
        drop(agent);
        server.await.unwrap();

        assert_eq!(reply.succ(), Some(&Success::Ok(Some(info))));
    }

    #[tokio::test]
    async fn test_server_error() {
        let config = test_config("server_error");
        let body = r#"{"fault_message":"Internal error"}"#;
        let response = format!(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let server = tokio::spawn(run_server(bind(&config), vec![response]));

        let mut agent = AsyncAgent::connect(&config).await.unwrap();
        let reply = agent.execute(&DescribeInstance::new()).await.unwrap();
        drop(agent);
        server.await.unwrap();

        let failure = reply.err().unwrap();
        assert_eq!(failure.code(), 500);
        assert_eq!(failure.kind(), FailureKind::Default);
        assert_eq!(
            failure.to_string(),
            "[GET /][500] describeInstance default  fault_message: Internal error"
        );
    }

    #[tokio::test]
    async fn test_timeout() {
        let mut config = test_config("timeout");
        config.timeout_ms = Some(100);
        let listener = bind(&config);
        // accepts but never answers
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(stream);
        });

        let mut agent = AsyncAgent::connect(&config).await.unwrap();
        let err = agent.execute(&DescribeInstance::new()).await.unwrap_err();
        assert!(matches!(err, crate::Error::Agent(AgentError::Timeout(100))));
        assert!(!agent.is_locked());
        assert!(!agent.is_connected());
        server.abort();
    }
}
