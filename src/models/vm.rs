use serde::{Deserialize, Serialize};

/// Defines the microVM running state. It is especially useful in the snapshotting context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Vm {
    pub state: VmState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VmState {
    Paused,
    Resumed,
}

impl Vm {
    pub const PAUSED: Vm = Vm {
        state: VmState::Paused,
    };
    pub const RESUMED: Vm = Vm {
        state: VmState::Resumed,
    };
}
