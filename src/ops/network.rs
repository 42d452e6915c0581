use crate::models::{Empty, NetworkInterface, PartialNetworkInterface};
use crate::operation::{operation, Expect};

operation!(
    /// Creates new network interface with ID specified by iface_id path parameter.
    PutGuestNetworkInterfaceById, "putGuestNetworkInterfaceByID", Put "/network-interfaces/{iface_id}",
    body = NetworkInterface,
    param = iface_id,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Updates the rate limiters applied to a network interface.
    PatchGuestNetworkInterfaceById, "patchGuestNetworkInterfaceByID", Patch "/network-interfaces/{iface_id}",
    body = PartialNetworkInterface,
    param = iface_id,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
