use serde::{Deserialize, Serialize};

use super::*;

/// Body of `GET /vm/config`: everything configured on the microVM so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FullVmConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balloon: Option<Balloon>,

    /// Configurations for all block devices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drives: Vec<Drive>,

    #[serde(rename = "boot-source", skip_serializing_if = "Option::is_none")]
    pub boot_source: Option<BootSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<Logger>,

    #[serde(rename = "machine-config", skip_serializing_if = "Option::is_none")]
    pub machine_config: Option<MachineConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,

    #[serde(rename = "mmds-config", skip_serializing_if = "Option::is_none")]
    pub mmds_config: Option<MmdsConfig>,

    /// Configurations for all net devices.
    #[serde(
        rename = "network-interfaces",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub network_interfaces: Vec<NetworkInterface>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsock: Option<Vsock>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<EntropyDevice>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_exported_config() {
        let body = r#"{
            "boot-source": {"kernel_image_path": "/vmlinux", "boot_args": "console=ttyS0"},
            "drives": [{"drive_id": "rootfs", "is_root_device": true, "is_read_only": false, "path_on_host": "/rootfs.ext4"}],
            "machine-config": {"vcpu_count": 2, "mem_size_mib": 256, "smt": false},
            "network-interfaces": []
        }"#;
        let config: FullVmConfiguration = serde_json::from_str(body).unwrap();
        assert_eq!(config.drives.len(), 1);
        assert_eq!(config.machine_config.unwrap().vcpu_count, 2);
        assert!(config.network_interfaces.is_empty());
        assert!(config.balloon.is_none());
    }
}
