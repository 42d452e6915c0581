use serde::{Deserialize, Serialize};

use super::rate_limiter::RateLimiter;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Drive {
    /// drive id
    /// Required: true
    pub drive_id: String,

    /// Represents the unique id of the boot partition of this device.
    /// It is optional and it will be taken into account
    /// only if the is_root_device field is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partuuid: Option<String>,

    /// Required: true
    pub is_root_device: bool,

    /// Represents the caching strategy for the block device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_type: Option<CacheType>,

    /// VirtioBlock only. Omitted for vhost-user-block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,

    /// VirtioBlock only. Host level path for the guest drive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_on_host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limiter: Option<RateLimiter>,

    /// VirtioBlock only. "Async" is supported on host kernels newer than 5.10.51.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_engine: Option<IoEngine>,

    /// VhostUserBlock only. Path to the socket of the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
}

impl Drive {
    /// A virtio-block drive backed by a file on the host.
    pub fn virtio<S: Into<String>, P: Into<String>>(
        drive_id: S,
        path_on_host: P,
        is_root_device: bool,
        is_read_only: bool,
    ) -> Self {
        Self {
            drive_id: drive_id.into(),
            partuuid: None,
            is_root_device,
            cache_type: None,
            is_read_only: Some(is_read_only),
            path_on_host: Some(path_on_host.into()),
            rate_limiter: None,
            io_engine: None,
            socket: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CacheType {
    Unsafe,
    Writeback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IoEngine {
    Sync,
    Async,
}

/// Update of an already attached drive. Only allowed after boot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialDrive {
    pub drive_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_on_host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limiter: Option<RateLimiter>,
}

impl PartialDrive {
    pub fn new(drive_id: &str, path_on_host: Option<&str>) -> Self {
        Self {
            drive_id: drive_id.to_string(),
            path_on_host: path_on_host.map(str::to_string),
            rate_limiter: None,
        }
    }
}
