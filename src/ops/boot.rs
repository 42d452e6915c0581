use crate::models::{BootSource, CpuConfig, Empty, MachineConfiguration};
use crate::operation::{operation, Expect};

operation!(
    /// Creates or updates the boot source. Pre-boot only.
    PutGuestBootSource, "putGuestBootSource", Put "/boot-source",
    body = BootSource,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Configures CPU features flags for the vCPUs of the guest VM. Pre-boot only.
    PutCpuConfiguration, "putCpuConfiguration", Put "/cpu-config",
    body = CpuConfig,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    GetMachineConfiguration, "getMachineConfiguration", Get "/machine-config",
    output = MachineConfiguration,
    [Expect::Output(200), Expect::Default]
);

operation!(
    /// Updates the Machine Configuration of the VM. Pre-boot only.
    /// All fields not present in the body are reset to their defaults.
    PutMachineConfiguration, "putMachineConfiguration", Put "/machine-config",
    body = MachineConfiguration,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Partially updates the Machine Configuration of the VM. Pre-boot only.
    PatchMachineConfiguration, "patchMachineConfiguration", Patch "/machine-config",
    body = MachineConfiguration,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
