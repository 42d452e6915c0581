//! Bodies exchanged with the Firecracker API.
pub mod balloon;
pub mod boot_source;
pub mod drive;
pub mod error;
pub mod full_vm_configuration;
pub mod instance_info;
pub mod logger;
pub mod machine_configuration;
pub mod mmds_config;
pub mod network_interface;
pub mod rate_limiter;
pub mod snapshot;
pub mod vm;
pub mod vsock;

pub use balloon::{Balloon, BalloonStats, BalloonStatsUpdate, BalloonUpdate};
pub use boot_source::BootSource;
pub use drive::{CacheType, Drive, IoEngine, PartialDrive};
pub use error::ApiError;
pub use full_vm_configuration::FullVmConfiguration;
pub use instance_info::{
    ActionType, FirecrackerVersion, InstanceActionInfo, InstanceInfo, InstanceState,
};
pub use logger::{LogLevel, Logger, Metrics};
pub use machine_configuration::{CpuConfig, CpuTemplate, HugePages, MachineConfiguration};
pub use mmds_config::{MmdsConfig, MmdsContents, MmdsVersion};
pub use network_interface::{NetworkInterface, PartialNetworkInterface};
pub use rate_limiter::{RateLimiter, TokenBucket};
pub use snapshot::{BackendType, MemoryBackend, SnapshotCreateParams, SnapshotLoadParams, SnapshotType};
pub use vm::{Vm, VmState};
pub use vsock::{EntropyDevice, Vsock};

/// Placeholder for responses that carry no body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Empty {}
