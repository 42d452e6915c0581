use crate::models::{Empty, FirecrackerVersion, FullVmConfiguration, InstanceActionInfo, InstanceInfo, Vm};
use crate::operation::{operation, Expect};

operation!(
    /// Returns general information about an instance.
    DescribeInstance, "describeInstance", Get "/",
    output = InstanceInfo,
    [Expect::Output(200), Expect::Default]
);

operation!(
    /// Creates a synchronous action.
    CreateSyncAction, "createSyncAction", Put "/actions",
    body = InstanceActionInfo,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    GetFirecrackerVersion, "getFirecrackerVersion", Get "/version",
    output = FirecrackerVersion,
    [Expect::Output(200), Expect::Default]
);

operation!(
    /// Gets the full VM configuration.
    GetExportVmConfig, "getExportVmConfig", Get "/vm/config",
    output = FullVmConfiguration,
    [Expect::Output(200), Expect::Default]
);

operation!(
    /// Pauses or resumes the microVM.
    PatchVm, "patchVm", Patch "/vm",
    body = Vm,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
