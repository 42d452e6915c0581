use crate::models::{Drive, Empty, PartialDrive};
use crate::operation::{operation, Expect};

operation!(
    /// Creates new drive with ID specified by drive_id path parameter.
    /// If a drive with the specified ID already exists, updates its state based on new input.
    /// Will fail if update is not possible.
    PutGuestDriveById, "putGuestDriveByID", Put "/drives/{drive_id}",
    body = Drive,
    param = drive_id,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);

operation!(
    /// Updates the properties of the drive with the ID specified by drive_id path parameter.
    /// Will fail if update is not possible.
    PatchGuestDriveById, "patchGuestDriveByID", Patch "/drives/{drive_id}",
    body = PartialDrive,
    param = drive_id,
    output = Empty,
    [Expect::NoContent(204), Expect::Fault(400, "BadRequest"), Expect::Default]
);
