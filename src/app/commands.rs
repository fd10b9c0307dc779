//! Inbound drive commands and the single-slot mailbox that carries them.
//!
//! The protocol layer (WebThings actions `stop`, `up`, `down`) posts a
//! [`DriveCommand`] into a [`CommandMailbox`]; the control loop takes at
//! most one per poll.  Posting overwrites whatever is still pending, so
//! the latest command wins.
//!
//! The mailbox is an `embassy-sync` [`Signal`], which lets the protocol
//! handler post through a shared `&'static` reference without handing it
//! mutable access to the control loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::control::state::DrivingMode;

/// Parameterless commands an external controller can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    Stop,
    Up,
    Down,
}

impl DriveCommand {
    /// Action name as exposed by the thing description.
    pub fn action_name(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Parse an action name.
    pub fn from_action_name(name: &str) -> Option<Self> {
        match name {
            "stop" => Some(Self::Stop),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Mode this command requests.
    pub fn mode(self) -> DrivingMode {
        match self {
            Self::Stop => DrivingMode::Stop,
            Self::Up => DrivingMode::Up,
            Self::Down => DrivingMode::Down,
        }
    }
}

/// Single-slot, latest-wins command mailbox.
pub struct CommandMailbox {
    slot: Signal<CriticalSectionRawMutex, DriveCommand>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Post a command, replacing any command not yet consumed.
    pub fn post(&self, cmd: DriveCommand) {
        self.slot.signal(cmd);
    }

    /// Take the pending command, if any.
    pub fn take(&self) -> Option<DriveCommand> {
        self.slot.try_take()
    }

    /// True if a command is waiting.
    pub fn is_pending(&self) -> bool {
        self.slot.signaled()
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}
