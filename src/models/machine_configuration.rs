use serde::{Deserialize, Serialize};

/// Describes the number of vCPUs, memory size, SMT capabilities, huge page configuration and
/// the CPU template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MachineConfiguration {
    /// Deprecated in favour of the custom templates of `PUT /cpu-config`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_template: Option<CpuTemplate>,

    /// Flag for enabling/disabling simultaneous multithreading. Can be enabled only on x86.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smt: Option<bool>,

    /// Memory size of VM
    /// Required: true
    pub mem_size_mib: u64,

    /// Enable dirty page tracking. If this is enabled, then incremental guest memory
    /// snapshots can be created. These belong to diff snapshots, which contain, besides
    /// the microVM state, only the memory dirtied since a previous snapshot. Full snapshots
    /// each contain a full copy of the guest memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_dirty_pages: Option<bool>,

    /// Number of vCPUs (either 1 or an even number)
    /// Required: true
    /// Maximum: 32
    /// Minimum: 1
    pub vcpu_count: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub huge_pages: Option<HugePages>,
}

impl MachineConfiguration {
    pub fn new(vcpu_count: u8, mem_size_mib: u64) -> Self {
        Self {
            cpu_template: None,
            smt: None,
            mem_size_mib,
            track_dirty_pages: None,
            vcpu_count,
            huge_pages: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HugePages {
    None,
    #[serde(rename = "2M")]
    Size2M,
}

/// The CPU Template defines a set of flags to be disabled from the microvm so that
/// the features exposed to the guest are the same as in the selected instance type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CpuTemplate {
    C3,
    T2,
    T2S,
    T2CL,
    T2A,
    V1N1,
    None,
}

/// Custom CPU template body of `PUT /cpu-config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CpuConfig {
    /// CPUIDs to be modified (x86_64)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpuid_modifiers: Option<Vec<CpuidModifier>>,

    /// Model specific registers to be modified (x86_64)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msr_modifiers: Option<Vec<RegisterModifier>>,

    /// Registers to be modified (aarch64)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_modifiers: Option<Vec<RegisterModifier>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CpuidModifier {
    pub leaf: String,
    pub subleaf: String,
    pub flags: u32,
    pub modifiers: Vec<CpuidRegisterModifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CpuidRegisterModifier {
    pub register: CpuidRegister,
    pub bitmap: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CpuidRegister {
    Eax,
    Ebx,
    Ecx,
    Edx,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RegisterModifier {
    pub addr: String,
    pub bitmap: String,
}
