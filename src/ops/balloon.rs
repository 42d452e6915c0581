use crate::models::{Balloon, BalloonStats, BalloonStatsUpdate, BalloonUpdate, Empty};
use crate::operation::{operation, Expect};

operation!(
    DescribeBalloonConfig, "describeBalloonConfig", Get "/balloon",
    output = Balloon,
    [Expect::Output(200), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Creates the balloon device. Pre-boot only.
    PutBalloon, "putBalloon", Put "/balloon",
    body = Balloon,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Updates the target size of the balloon. Post-boot only.
    PatchBalloon, "patchBalloon", Patch "/balloon",
    body = BalloonUpdate,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    DescribeBalloonStats, "describeBalloonStats", Get "/balloon/statistics",
    output = BalloonStats,
    [Expect::Output(200), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    PatchBalloonStatsInterval, "patchBalloonStatsInterval", Patch "/balloon/statistics",
    body = BalloonStatsUpdate,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
