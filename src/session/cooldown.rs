//! Cooldown countdown between sets

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    Counting { remaining: u32 },
    Finished,
}

/// Counts down once from its start value, then calls `on_complete` exactly once.
/// No pause, skip or reset.
pub struct CooldownController {
    remaining: u32,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl CooldownController {
    /// A start value of 0 completes immediately, without a tick.
    pub fn start(cooldown_time: u32, on_complete: impl FnOnce() + 'static) -> Self {
        let mut cooldown = Self {
            remaining: cooldown_time,
            on_complete: Some(Box::new(on_complete)),
        };
        debug!("Cooldown started: {}s", cooldown_time);
        if cooldown_time == 0 {
            cooldown.complete();
        }
        cooldown
    }

    /// One elapsed second. Ticks after completion are ignored.
    pub fn tick(&mut self) -> CooldownStatus {
        if self.is_finished() {
            return CooldownStatus::Finished;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.complete();
            CooldownStatus::Finished
        } else {
            CooldownStatus::Counting { remaining: self.remaining }
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.on_complete.is_none()
    }

    fn complete(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            debug!("Cooldown finished");
            on_complete();
        }
    }
}

impl fmt::Debug for CooldownController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CooldownController")
            .field("remaining", &self.remaining)
            .field("finished", &self.is_finished())
            .finish()
    }
}
