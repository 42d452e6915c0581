use std::path::{Path, PathBuf};
use std::time::Duration;

use log::*;
use serde::{Deserialize, Serialize};

use crate::{handle_entry, Error, Result};

pub const SOCKET_PATH_ENV: &str = "FCAPI_SOCKET_PATH";
pub const LOCK_PATH_ENV: &str = "FCAPI_LOCK_PATH";
pub const SOCKET_RETRY_ENV: &str = "FCAPI_SOCKET_RETRY";
pub const TIMEOUT_MS_ENV: &str = "FCAPI_TIMEOUT_MS";

const DEFAULT_SOCKET_RETRY: usize = 3;
const DEFAULT_RETRY_INTERVAL_MS: u64 = 100;

fn default_socket_retry() -> usize {
    DEFAULT_SOCKET_RETRY
}

fn default_retry_interval_ms() -> u64 {
    DEFAULT_RETRY_INTERVAL_MS
}

/// Where and how an agent talks to the Firecracker API socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AgentConfig {
    /// Path of the API unix socket.
    pub socket_path: PathBuf,

    /// Lock file held while a request/response pair is in flight.
    pub lock_path: PathBuf,

    /// How many times connecting is retried before giving up.
    #[serde(default = "default_socket_retry")]
    pub socket_retry: usize,

    /// Pause between two connect attempts.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Upper bound for one exchange. None waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl AgentConfig {
    pub fn new(socket_path: PathBuf, lock_path: PathBuf) -> Self {
        Self {
            socket_path,
            lock_path,
            socket_retry: DEFAULT_SOCKET_RETRY,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            timeout_ms: None,
        }
    }

    /// Lock file next to the socket: `<socket_path>.lock`.
    pub fn with_socket(socket_path: PathBuf) -> Self {
        let lock_path = default_lock_path(&socket_path);
        Self::new(socket_path, lock_path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.socket_path.as_os_str().is_empty() {
            let msg = "Socket path must be specified";
            error!("{msg}");
            return Err(Error::Config(msg.into()));
        }
        if self.lock_path.as_os_str().is_empty() {
            let msg = "Lock path must be specified";
            error!("{msg}");
            return Err(Error::Config(msg.into()));
        }
        if self.lock_path == self.socket_path {
            let msg = format!(
                "Lock path {} must differ from the socket path",
                self.lock_path.display()
            );
            error!("{msg}");
            return Err(Error::Config(msg));
        }
        if self.timeout_ms == Some(0) {
            let msg = "Timeout must be positive, leave it unset to wait forever";
            error!("{msg}");
            return Err(Error::Config(msg.into()));
        }
        Ok(())
    }

    /// Reads a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            let msg = format!("Fail to parse {}: {e}", path.display());
            error!("{msg}");
            Error::Config(msg)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from `FCAPI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let socket_path = PathBuf::from(handle_entry(&lookup(SOCKET_PATH_ENV), SOCKET_PATH_ENV)?);
        let mut config = match lookup(LOCK_PATH_ENV) {
            Some(lock_path) => Self::new(socket_path, PathBuf::from(lock_path)),
            None => Self::with_socket(socket_path),
        };
        if let Some(retry) = lookup(SOCKET_RETRY_ENV) {
            config.socket_retry = parse_number(&retry, SOCKET_RETRY_ENV)?;
        }
        if let Some(timeout) = lookup(TIMEOUT_MS_ENV) {
            config.timeout_ms = Some(parse_number(&timeout, TIMEOUT_MS_ENV)?);
        }
        config.validate()?;
        Ok(config)
    }
}

fn default_lock_path(socket_path: &Path) -> PathBuf {
    let mut lock_path = socket_path.as_os_str().to_owned();
    lock_path.push(".lock");
    PathBuf::from(lock_path)
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        let msg = format!("{name} expects a number, got {value:?}");
        error!("{msg}");
        Error::Config(msg)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::with_socket(PathBuf::from("/run/fc/api.sock"));
        assert_eq!(config.lock_path, PathBuf::from("/run/fc/api.sock.lock"));
        assert_eq!(config.socket_retry, 3);
        assert_eq!(config.retry_interval(), Duration::from_millis(100));
        assert_eq!(config.timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut config = AgentConfig::new(PathBuf::from("/tmp/a.sock"), PathBuf::from("/tmp/a.sock"));
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.lock_path = PathBuf::from("/tmp/a.lock");
        config.timeout_ms = Some(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.timeout_ms = Some(500);
        assert!(config.validate().is_ok());

        config.socket_path = PathBuf::new();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"socket_path":"/tmp/fc.sock","lock_path":"/tmp/fc.lock"}"#)
                .unwrap();
        assert_eq!(
            config,
            AgentConfig::new(PathBuf::from("/tmp/fc.sock"), PathBuf::from("/tmp/fc.lock"))
        );
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("fcapi_config_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"socket_path":"/tmp/fc.sock","lock_path":"/tmp/fc.lock","timeout_ms":250}"#,
        )
        .unwrap();
        let config = AgentConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));

        assert!(matches!(
            AgentConfig::from_file("/nonexistent/fcapi.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_from_lookup() {
        let config = AgentConfig::from_lookup(lookup(&[
            (SOCKET_PATH_ENV, "/tmp/vm0.sock"),
            (SOCKET_RETRY_ENV, "7"),
            (TIMEOUT_MS_ENV, "1500"),
        ]))
        .unwrap();
        assert_eq!(config.socket_path, PathBuf::from("/tmp/vm0.sock"));
        assert_eq!(config.lock_path, PathBuf::from("/tmp/vm0.sock.lock"));
        assert_eq!(config.socket_retry, 7);
        assert_eq!(config.timeout_ms, Some(1500));

        let config = AgentConfig::from_lookup(lookup(&[
            (SOCKET_PATH_ENV, "/tmp/vm0.sock"),
            (LOCK_PATH_ENV, "/var/lock/vm0"),
        ]))
        .unwrap();
        assert_eq!(config.lock_path, PathBuf::from("/var/lock/vm0"));
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(matches!(
            AgentConfig::from_lookup(lookup(&[])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AgentConfig::from_lookup(lookup(&[
                (SOCKET_PATH_ENV, "/tmp/vm0.sock"),
                (SOCKET_RETRY_ENV, "many"),
            ])),
            Err(Error::Config(_))
        ));
    }
}
