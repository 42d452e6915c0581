use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SnapshotCreateParams {
    /// Path to the file that will contain the guest memory.
    pub mem_file_path: String,

    /// Path to the file that will contain the microVM state.
    pub snapshot_path: String,

    /// Type of snapshot to create. It is optional and by default, a full
    /// snapshot is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_type: Option<SnapshotType>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SnapshotType {
    Full,
    Diff,
}

/// Exactly one of `mem_file_path` and `mem_backend` has to be set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SnapshotLoadParams {
    /// Enable support for incremental (diff) snapshots by tracking dirty guest pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_diff_snapshots: Option<bool>,

    /// Deprecated in favour of `mem_backend`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_file_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_backend: Option<MemoryBackend>,

    /// Path to the file that contains the microVM state to be loaded.
    pub snapshot_path: String,

    /// When set to true, the vm is also resumed if the snapshot load is successful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_vm: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MemoryBackend {
    pub backend_type: BackendType,

    /// File path for `File`, UDS path for `Uffd`.
    pub backend_path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BackendType {
    File,
    Uffd,
}
