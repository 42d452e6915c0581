use serde::{Deserialize, Serialize};

use super::rate_limiter::RateLimiter;

/// A vsock device, backed by a set of Unix Domain Sockets on the host side.
///
/// Host-initiated connections go through the socket at `uds_path` followed by
/// a `CONNECT <port>\n` request. Guest-initiated connections expect the host
/// to listen on `uds_path_<PORT>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Vsock {
    /// Guest Vsock CID
    /// Minimum: 3
    pub guest_cid: u32,

    /// Path to UNIX domain socket, used to proxy vsock connections.
    pub uds_path: String,

    /// This parameter has been deprecated and it will be removed in future
    /// Firecracker release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsock_id: Option<String>,
}

/// Defines an entropy device.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EntropyDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limiter: Option<RateLimiter>,
}
