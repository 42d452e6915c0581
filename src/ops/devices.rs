use crate::models::{Empty, EntropyDevice, Logger, Metrics, Vsock};
use crate::operation::{operation, Expect};

operation!(
    PutEntropyDevice, "putEntropyDevice", Put "/entropy",
    body = EntropyDevice,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// The first call creates the device with the configuration specified in body.
    /// Subsequent calls will update the device configuration. Pre-boot only.
    PutGuestVsock, "putGuestVsock", Put "/vsock",
    body = Vsock,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    PutLogger, "putLogger", Put "/logger",
    body = Logger,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    PutMetrics, "putMetrics", Put "/metrics",
    body = Metrics,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
