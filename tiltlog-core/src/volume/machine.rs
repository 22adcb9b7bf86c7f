//! Mount state machine

/// Mount state of one volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountState {
    /// No filesystem handle; file operations fail
    #[default]
    Unmounted,
    /// Filesystem handle valid and usable
    Mounted,
}

/// Outcomes of driver calls that affect the mount state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VolumeEvent {
    /// Driver mounted the filesystem
    MountSucceeded,
    /// Driver failed to mount; any previous handle is gone
    MountFailed,
    /// Driver released the filesystem
    UnmountSucceeded,
    /// Driver refused to unmount
    UnmountFailed,
    /// Driver state observed after an operation with side effects (format)
    Observed { mounted: bool },
}

impl MountState {
    pub fn is_mounted(&self) -> bool {
        matches!(self, MountState::Mounted)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: VolumeEvent) -> Self {
        use MountState::*;
        use VolumeEvent::*;

        match (self, event) {
            (_, MountSucceeded) => Mounted,
            (_, MountFailed) => Unmounted,
            (_, UnmountSucceeded) => Unmounted,
            (state, UnmountFailed) => state,
            (_, Observed { mounted: true }) => Mounted,
            (_, Observed { mounted: false }) => Unmounted,
        }
    }
}
