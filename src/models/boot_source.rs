use serde::{Deserialize, Serialize};

/// Boot source descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BootSource {
    /// Kernel boot arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_args: Option<String>,

    /// Host level path to the initrd image used to boot the guest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initrd_path: Option<String>,

    /// Host level path to the kernel image used to boot the guest
    /// Required: true
    pub kernel_image_path: String,
}
