//! Autoplay state machine. The engine owns the actual timer; this module only
//! decides when a timer must be armed, re-armed, or cancelled, and which
//! ticks are still valid.

use std::time::Duration;

pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoplayState {
    Running {
        epoch: u64,
    },
    #[default]
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayChange {
    /// Suspended -> Running: arm a timer for `epoch`.
    Started { epoch: u64 },
    /// Still running but the offer count changed: replace the timer.
    Rearmed { epoch: u64 },
    /// Running -> Suspended: cancel the timer.
    Stopped,
}

#[derive(Debug, Default)]
pub struct Autoplay {
    state: AutoplayState,
    last_epoch: u64,
    armed_len: usize,
}

impl Autoplay {
    pub fn state(&self) -> AutoplayState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AutoplayState::Running { .. })
    }

    /// Re-evaluate after `paused`, `modal_open`, or the offer count changed.
    pub fn reconcile(
        &mut self,
        paused: bool,
        modal_open: bool,
        offer_count: usize,
    ) -> Option<AutoplayChange> {
        let should_run = !paused && !modal_open;
        match (self.state, should_run) {
            (AutoplayState::Suspended, true) => {
                let epoch = self.arm(offer_count);
                Some(AutoplayChange::Started { epoch })
            }
            (AutoplayState::Running { .. }, true) if offer_count != self.armed_len => {
                let epoch = self.arm(offer_count);
                Some(AutoplayChange::Rearmed { epoch })
            }
            (AutoplayState::Running { .. }, false) => {
                self.state = AutoplayState::Suspended;
                Some(AutoplayChange::Stopped)
            }
            _ => None,
        }
    }

    /// Whether a tick from the timer armed for `epoch` should advance the slide.
    pub fn accepts(&self, epoch: u64) -> bool {
        matches!(self.state, AutoplayState::Running { epoch: current } if current == epoch)
    }

    fn arm(&mut self, offer_count: usize) -> u64 {
        self.last_epoch += 1;
        self.armed_len = offer_count;
        self.state = AutoplayState::Running {
            epoch: self.last_epoch,
        };
        self.last_epoch
    }
}
