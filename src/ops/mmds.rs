use crate::models::{Empty, MmdsConfig, MmdsContents};
use crate::operation::{operation, Expect};

operation!(
    GetMmds, "getMmds", Get "/mmds",
    output = MmdsContents,
    [Expect::Output(200), Expect::Fault(404, "NotFound"), Expect::Default]
);

operation!(
    PutMmds, "putMmds", Put "/mmds",
    body = MmdsContents,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    PatchMmds, "patchMmds", Patch "/mmds",
    body = MmdsContents,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Configures MMDS version, IPv4 address used by the MMDS network stack
    /// and interfaces that allow MMDS requests.
    PutMmdsConfig, "putMmdsConfig", Put "/mmds/config",
    body = MmdsConfig,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
