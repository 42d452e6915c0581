use crate::models::{Empty, SnapshotCreateParams, SnapshotLoadParams};
use crate::operation::{operation, Expect};

operation!(
    /// Creates a snapshot of the microVM state. The microVM should be in the `Paused` state.
    CreateSnapshot, "createSnapshot", Put "/snapshot/create",
    body = SnapshotCreateParams,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Loads the microVM state from a snapshot.
    /// Only accepted on a fresh Firecracker process (before configuring any resource other than the Logger and Metrics).
    LoadSnapshot, "loadSnapshot", Put "/snapshot/load",
    body = SnapshotLoadParams,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
