use serde::{Deserialize, Serialize};

/// Defines the MMDS configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MmdsConfig {
    /// Enumeration indicating the MMDS version to be configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<MmdsVersion>,

    /// List of the network interface IDs capable of forwarding packets to
    /// the MMDS. Network interface IDs mentioned must be valid at the time
    /// of this request.
    pub network_interfaces: Vec<String>,

    /// A valid IPv4 link-local address. Defaults to 169.254.169.254.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MmdsVersion {
    V1,
    V2,
}

/// The MMDS data store is free-form JSON.
pub type MmdsContents = serde_json::Value;
