use serde::{Deserialize, Serialize};

/// The current detailed state of the Firecracker instance.
/// This value is read-only for the control-plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InstanceState {
    #[serde(rename = "Not started")]
    NotStarted,
    Running,
    Paused,
}

/// Describes MicroVM instance information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct InstanceInfo {
    /// Application name.
    pub app_name: String,

    /// MicroVM / instance ID.
    pub id: String,

    pub state: InstanceState,

    /// MicroVM hypervisor build version.
    pub vmm_version: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionType {
    FlushMetrics,
    InstanceStart,
    SendCtrlAltDel,
}

/// Variant wrapper containing the real action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct InstanceActionInfo {
    pub action_type: ActionType,
}

impl InstanceActionInfo {
    pub fn new(action_type: ActionType) -> Self {
        Self { action_type }
    }
}

/// Describes the Firecracker version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FirecrackerVersion {
    /// Firecracker build version.
    pub firecracker_version: String,
}
