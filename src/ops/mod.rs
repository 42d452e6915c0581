//! Every operation of the Firecracker API, one type per endpoint.
//!
//! Response tables follow the API schema in declaration order.
mod balloon;
mod boot;
mod devices;
mod drive;
mod instance;
mod mmds;
mod network;
mod snapshot;

pub use balloon::*;
pub use boot::*;
pub use devices::*;
pub use drive::*;
pub use instance::*;
pub use mmds::*;
pub use network::*;
pub use snapshot::*;

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::*;
    use crate::operation::{Expect, Method, Operation};

    #[test]
    fn test_descriptor_names() {
        assert_eq!(PutGuestDriveById::DESCRIPTOR, &PUT_GUEST_DRIVE_BY_ID);
        assert_eq!(PUT_GUEST_DRIVE_BY_ID.id, "putGuestDriveByID");
        assert_eq!(PUT_GUEST_DRIVE_BY_ID.method, Method::Put);
        assert_eq!(PUT_GUEST_DRIVE_BY_ID.path, "/drives/{drive_id}");
        assert_eq!(
            PUT_GUEST_DRIVE_BY_ID.responses,
            &[
                Expect::NoContent(204),
                Expect::Fault(400, "BadRequest"),
                Expect::Default
            ]
        );
        assert_eq!(DescribeInstance::DESCRIPTOR.path, "/");
        assert_eq!(GET_MMDS.responses[1], Expect::Fault(404, "NotFound"));
    }

    #[test]
    fn test_path_parameters() {
        let op = PutGuestDriveById::new(Drive::virtio("rootfs", "/rootfs.ext4", true, false));
        assert_eq!(op.path(), "/drives/rootfs");

        let op = PatchGuestNetworkInterfaceById::new(PartialNetworkInterface {
            iface_id: "eth0".into(),
            rx_rate_limiter: None,
            tx_rate_limiter: None,
        });
        assert_eq!(op.path(), "/network-interfaces/eth0");
    }

    #[test]
    fn test_bodies() {
        assert_eq!(GetFirecrackerVersion::new().body().unwrap(), None);

        let op = CreateSyncAction::new(InstanceActionInfo::new(ActionType::InstanceStart));
        assert_eq!(
            op.body().unwrap().as_deref(),
            Some(r#"{"action_type":"InstanceStart"}"#)
        );

        let op = PatchVm::new(Vm::PAUSED);
        assert_eq!(op.body().unwrap().as_deref(), Some(r#"{"state":"Paused"}"#));

        let op = PutMmds::new(serde_json::json!({"latest": {"meta-data": {"ami-id": "ami-12345678"}}}));
        assert!(op.body().unwrap().unwrap().contains("ami-12345678"));
    }

    #[test]
    fn test_every_table_has_a_default() {
        let descriptors = [
            &DESCRIBE_INSTANCE,
            &CREATE_SYNC_ACTION,
            &GET_FIRECRACKER_VERSION,
            &GET_EXPORT_VM_CONFIG,
            &PATCH_VM,
            &DESCRIBE_BALLOON_CONFIG,
            &PUT_BALLOON,
            &PATCH_BALLOON,
            &DESCRIBE_BALLOON_STATS,
            &PATCH_BALLOON_STATS_INTERVAL,
            &PUT_GUEST_BOOT_SOURCE,
            &PUT_CPU_CONFIGURATION,
            &GET_MACHINE_CONFIGURATION,
            &PUT_MACHINE_CONFIGURATION,
            &PATCH_MACHINE_CONFIGURATION,
            &PUT_GUEST_DRIVE_BY_ID,
            &PATCH_GUEST_DRIVE_BY_ID,
            &PUT_ENTROPY_DEVICE,
            &PUT_GUEST_VSOCK,
            &PUT_LOGGER,
            &PUT_METRICS,
            &GET_MMDS,
            &PUT_MMDS,
            &PATCH_MMDS,
            &PUT_MMDS_CONFIG,
            &PUT_GUEST_NETWORK_INTERFACE_BY_ID,
            &PATCH_GUEST_NETWORK_INTERFACE_BY_ID,
            &CREATE_SNAPSHOT,
            &LOAD_SNAPSHOT,
        ];
        for descriptor in descriptors {
            assert_eq!(descriptor.responses.last(), Some(&Expect::Default), "{}", descriptor.id);
        }
    }
}
