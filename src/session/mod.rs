//! Session module - exercise timer and cooldown state machines
//!
//! Features:
//! - Per-set countdown with start/pause/reset/skip
//! - Cooldown hand-off after a fixed set
//! - Snapshot observers and an effect outbox for the front-end

pub mod cooldown;
pub mod timer;

pub use cooldown::{CooldownController, CooldownStatus};
pub use timer::ExerciseController;

use std::time::Duration;

use crate::exercises::Exercise;
use crate::navigation::Route;

/// Default cooldown length in seconds
pub const DEFAULT_COOLDOWN_SECS: u32 = 30;
/// Set number that sends the session into cooldown
pub const DEFAULT_COOLDOWN_TRIGGER_SET: u32 = 3;
/// Vibration length when a set's time is up
pub const EXPIRY_VIBRATION: Duration = Duration::from_millis(1000);

/// Timer settings for one exercise session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seconds per set. Deliberately has no default.
    pub set_duration: u32,
    pub cooldown_time: u32,
    pub cooldown_trigger_set: u32,
}

impl SessionConfig {
    pub fn new(set_duration: u32) -> Self {
        Self {
            set_duration,
            cooldown_time: DEFAULT_COOLDOWN_SECS,
            cooldown_trigger_set: DEFAULT_COOLDOWN_TRIGGER_SET,
        }
    }

    pub fn with_cooldown_time(mut self, seconds: u32) -> Self {
        self.cooldown_time = seconds;
        self
    }

    pub fn with_cooldown_trigger_set(mut self, set: u32) -> Self {
        self.cooldown_trigger_set = set;
        self
    }
}

/// Where the exercise timer currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Not counting, time left
    Idle,
    Running,
    /// Hit zero, waiting for "Next Set" or "Reset Timer"
    Expired,
    Cooldown,
    /// Last exercise done, nothing more to do on this screen
    Finished,
}

/// Read-only view of a session, handed to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub exercise: Exercise,
    pub exercise_index: usize,
    pub exercise_count: usize,
    pub current_set: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub is_in_cooldown: bool,
    pub cooldown_remaining: Option<u32>,
    pub phase: TimerPhase,
}

impl SessionSnapshot {
    pub fn is_last_exercise(&self) -> bool {
        self.exercise_index + 1 == self.exercise_count
    }
}

/// Choice offered when a set's time runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    NextSet,
    ResetTimer,
}

impl PromptChoice {
    pub fn label(&self) -> &'static str {
        match self {
            PromptChoice::NextSet => "Next Set",
            PromptChoice::ResetTimer => "Reset Timer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    SetExpired { set: u32 },
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::SetExpired { .. } => "Time is up!",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Prompt::SetExpired { set } => format!("You've completed set {}.", set),
        }
    }

    pub fn choices(&self) -> &'static [PromptChoice] {
        match self {
            Prompt::SetExpired { .. } => &[PromptChoice::NextSet, PromptChoice::ResetTimer],
        }
    }
}

/// Side effect requested by a controller. The front-end performs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Vibrate(Duration),
    Prompt(Prompt),
    Alert { title: &'static str, message: &'static str },
    Navigate(Route),
    CooldownStarted { seconds: u32 },
    CooldownFinished,
    WorkoutComplete,
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SessionSnapshot)>;

/// Snapshot listeners
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, snapshot: &SessionSnapshot) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_besides_duration() {
        let config = SessionConfig::new(45);
        assert_eq!(config.set_duration, 45);
        assert_eq!(config.cooldown_time, 30);
        assert_eq!(config.cooldown_trigger_set, 3);
    }

    #[test]
    fn test_expired_prompt_text() {
        let prompt = Prompt::SetExpired { set: 2 };
        assert_eq!(prompt.title(), "Time is up!");
        assert_eq!(prompt.message(), "You've completed set 2.");
        assert_eq!(prompt.choices(), &[PromptChoice::NextSet, PromptChoice::ResetTimer]);
    }
}
