//! Set/exercise timer controller
//!
//! One instance per exercise screen. It owns the countdown for the current
//! set, walks through sets and exercises, and hands off to a
//! [`CooldownController`] when the trigger set is reached. It never touches
//! the screen or router directly: state changes go to observers and side
//! effects are queued for the front-end to drain.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use super::cooldown::CooldownController;
use super::{
    Effect, EXPIRY_VIBRATION, Observers, Prompt, SessionConfig, SessionSnapshot, SubscriptionId,
    TimerPhase,
};
use crate::error::{InputError, SessionError};
use crate::exercises::Exercise;
use crate::handoff::HandoffParams;
use crate::navigation::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Countdown {
    Idle,
    Running,
    Expired,
}

pub struct ExerciseController {
    config: SessionConfig,
    exercises: Vec<Exercise>,
    /// Handoff payload, passed on unchanged when navigating
    params: HandoffParams,
    index: usize,
    current_set: u32,
    remaining: u32,
    countdown: Countdown,
    cooldown: Option<CooldownController>,
    /// Cooldown already taken for the current exercise
    cooled_down: bool,
    finished: bool,
    effects: Rc<RefCell<Vec<Effect>>>,
    observers: Observers,
}

impl ExerciseController {
    /// Build a session from an already decoded list
    pub fn new(exercises: Vec<Exercise>, index: usize, config: SessionConfig) -> Result<Self, InputError> {
        if exercises.is_empty() {
            return Err(InputError::EmptyExerciseList);
        }
        if let Some((position, reason)) = exercises
            .iter()
            .enumerate()
            .find_map(|(i, ex)| ex.defect().map(|reason| (i, reason)))
        {
            return Err(InputError::InvalidExercise { position, reason });
        }
        if index >= exercises.len() {
            return Err(InputError::IndexOutOfBounds {
                index,
                len: exercises.len(),
            });
        }
        let params = HandoffParams::encode(&exercises, index)?;
        Ok(Self::build(exercises, params, index, config))
    }

    /// Build a session from screen handoff parameters
    pub fn from_handoff(params: &HandoffParams, config: SessionConfig) -> Result<Self, InputError> {
        let (exercises, index) = params.decode()?;
        Ok(Self::build(exercises, params.clone(), index, config))
    }

    fn build(exercises: Vec<Exercise>, params: HandoffParams, index: usize, config: SessionConfig) -> Self {
        info!(
            "Exercise session opened: {} ({}/{})",
            exercises[index].name,
            index + 1,
            exercises.len()
        );
        Self {
            config,
            exercises,
            params,
            index,
            current_set: 1,
            remaining: config.set_duration,
            countdown: Countdown::Idle,
            cooldown: None,
            cooled_down: false,
            finished: false,
            effects: Rc::new(RefCell::new(Vec::new())),
            observers: Observers::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercises[self.index]
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn phase(&self) -> TimerPhase {
        if self.finished {
            TimerPhase::Finished
        } else if self.cooldown.is_some() {
            TimerPhase::Cooldown
        } else {
            match self.countdown {
                Countdown::Idle => TimerPhase::Idle,
                Countdown::Running => TimerPhase::Running,
                Countdown::Expired => TimerPhase::Expired,
            }
        }
    }

    /// True while elapsed seconds change anything
    pub fn wants_ticks(&self) -> bool {
        matches!(self.phase(), TimerPhase::Running | TimerPhase::Cooldown)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            exercise: self.exercise().clone(),
            exercise_index: self.index,
            exercise_count: self.exercises.len(),
            current_set: self.current_set,
            remaining_seconds: self.remaining,
            is_running: self.countdown == Countdown::Running,
            is_in_cooldown: self.cooldown.is_some(),
            cooldown_remaining: self.cooldown.as_ref().map(|c| c.remaining_seconds()),
            phase: self.phase(),
        }
    }

    /// Register a snapshot listener, called after every state change.
    /// Listeners must not call back into the controller.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionSnapshot) + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Drain queued side effects in the order they were produced
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut *self.effects.borrow_mut())
    }

    // --- Commands ---

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;
        match self.countdown {
            Countdown::Running => Err(SessionError::AlreadyRunning),
            Countdown::Expired => Err(SessionError::TimerExpired),
            Countdown::Idle => {
                self.countdown = Countdown::Running;
                debug!("Timer started at {}s (set {})", self.remaining, self.current_set);
                self.notify();
                Ok(())
            }
        }
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;
        if self.countdown != Countdown::Running {
            return Err(SessionError::NotRunning);
        }
        self.countdown = Countdown::Idle;
        debug!("Timer paused at {}s", self.remaining);
        self.notify();
        Ok(())
    }

    /// Start/Pause button
    pub fn toggle(&mut self) -> Result<(), SessionError> {
        if self.countdown == Countdown::Running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;
        self.reset_timer();
        debug!("Timer reset to {}s", self.remaining);
        self.notify();
        Ok(())
    }

    /// Advance to the next set, or to the next exercise after the last set.
    /// Reaching the trigger set starts the cooldown.
    pub fn next_set(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;

        if self.current_set < self.exercise().sets {
            self.current_set += 1;
            self.reset_timer();
            info!("Set {}/{} of {}", self.current_set, self.exercise().sets, self.exercise().name);
            if self.current_set == self.config.cooldown_trigger_set && !self.cooled_down {
                self.enter_cooldown();
            }
            self.notify();
            Ok(())
        } else {
            self.push(Effect::Alert {
                title: "All sets complete!",
                message: "Moving to the next exercise.",
            });
            self.advance_exercise();
            Ok(())
        }
    }

    /// Like `next_set` without the cooldown. On the final set this only
    /// reports completion and stays on the current exercise.
    pub fn skip_set(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;

        if self.current_set < self.exercise().sets {
            self.current_set += 1;
            self.reset_timer();
            info!("Skipped to set {}/{}", self.current_set, self.exercise().sets);
        } else {
            self.push(Effect::Alert {
                title: "Workout Complete!",
                message: "You've completed all sets. Great job!",
            });
        }
        self.notify();
        Ok(())
    }

    /// Next/Finish button
    pub fn next_exercise(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;
        self.advance_exercise();
        Ok(())
    }

    /// Go back one exercise with a fresh, stopped timer
    pub fn previous_exercise(&mut self) -> Result<(), SessionError> {
        self.ensure_interactive()?;
        if self.index == 0 {
            return Err(SessionError::NoPreviousExercise);
        }
        self.enter_exercise(self.index - 1, false);
        self.notify();
        Ok(())
    }

    /// One elapsed second
    pub fn tick(&mut self) {
        if self.finished {
            return;
        }

        if let Some(cooldown) = self.cooldown.as_mut() {
            cooldown.tick();
            if cooldown.is_finished() {
                self.cooldown = None;
                info!("Cooldown over, back to {}", self.exercise().name);
            }
            self.notify();
            return;
        }

        if self.countdown != Countdown::Running {
            return;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.countdown = Countdown::Expired;
            info!("Time is up for set {} of {}", self.current_set, self.exercise().name);
            self.push(Effect::Vibrate(EXPIRY_VIBRATION));
            self.push(Effect::Prompt(Prompt::SetExpired { set: self.current_set }));
        }
        self.notify();
    }

    // --- Internals ---

    fn ensure_interactive(&self) -> Result<(), SessionError> {
        if self.finished {
            Err(SessionError::WorkoutFinished)
        } else if self.cooldown.is_some() {
            Err(SessionError::InCooldown)
        } else {
            Ok(())
        }
    }

    fn reset_timer(&mut self) {
        self.remaining = self.config.set_duration;
        self.countdown = Countdown::Idle;
    }

    fn enter_cooldown(&mut self) {
        self.cooled_down = true;
        self.countdown = Countdown::Idle;
        info!("Cooldown for {}s after set {}", self.config.cooldown_time, self.current_set);
        self.push(Effect::CooldownStarted {
            seconds: self.config.cooldown_time,
        });

        let effects = self.effects.clone();
        let cooldown = CooldownController::start(self.config.cooldown_time, move || {
            effects.borrow_mut().push(Effect::CooldownFinished);
        });
        if !cooldown.is_finished() {
            self.cooldown = Some(cooldown);
        }
    }

    fn enter_exercise(&mut self, index: usize, auto_start: bool) {
        self.index = index;
        self.current_set = 1;
        self.cooled_down = false;
        self.remaining = self.config.set_duration;
        self.countdown = if auto_start {
            Countdown::Running
        } else {
            Countdown::Idle
        };
        info!(
            "Exercise {}/{}: {}",
            index + 1,
            self.exercises.len(),
            self.exercise().name
        );
        self.push(Effect::Navigate(Route::Exercise {
            params: self.params.with_index(index),
            auto_start,
        }));
    }

    fn advance_exercise(&mut self) {
        if self.index + 1 < self.exercises.len() {
            self.enter_exercise(self.index + 1, true);
        } else {
            self.finished = true;
            self.countdown = Countdown::Idle;
            info!("Workout complete: {} exercises", self.exercises.len());
            self.push(Effect::Alert {
                title: "Workout Complete!",
                message: "You've completed all exercises.",
            });
            self.push(Effect::WorkoutComplete);
            self.push(Effect::Navigate(Route::Workout { goal: None }));
        }
        self.notify();
    }

    fn push(&self, effect: Effect) {
        self.effects.borrow_mut().push(effect);
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ex(name: &str, sets: u32) -> Exercise {
        Exercise::new(name, sets, 10, format!("{} description", name))
    }

    fn controller(sets: &[u32], duration: u32) -> ExerciseController {
        let list = sets
            .iter()
            .enumerate()
            .map(|(i, s)| ex(&format!("Exercise {}", i + 1), *s))
            .collect();
        ExerciseController::new(list, 0, SessionConfig::new(duration)).unwrap()
    }

    fn run_out(c: &mut ExerciseController) {
        c.start().unwrap();
        for _ in 0..c.config().set_duration {
            c.tick();
        }
    }

    #[test]
    fn test_new_session_starts_idle_at_set_one() {
        for duration in [5, 30] {
            let c = controller(&[3, 4], duration);
            let snap = c.snapshot();
            assert_eq!(snap.remaining_seconds, duration);
            assert_eq!(snap.current_set, 1);
            assert_eq!(snap.phase, TimerPhase::Idle);
            assert!(!snap.is_running);
            assert!(!snap.is_in_cooldown);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let config = SessionConfig::new(30);
        assert!(matches!(
            ExerciseController::new(vec![], 0, config),
            Err(InputError::EmptyExerciseList)
        ));
        assert!(matches!(
            ExerciseController::new(vec![ex("A", 3)], 1, config),
            Err(InputError::IndexOutOfBounds { index: 1, len: 1 })
        ));
        assert!(matches!(
            ExerciseController::from_handoff(&HandoffParams::new("[]", "x"), config),
            Err(InputError::EmptyExerciseList)
        ));
    }

    #[test]
    fn test_from_handoff_uses_index() {
        let params = HandoffParams::encode(&[ex("A", 3), ex("B", 2)], 1).unwrap();
        let c = ExerciseController::from_handoff(&params, SessionConfig::new(30)).unwrap();
        assert_eq!(c.exercise().name, "B");
        assert_eq!(c.snapshot().exercise_index, 1);
    }

    #[test]
    fn test_start_and_pause() {
        let mut c = controller(&[3], 10);
        c.start().unwrap();
        assert_eq!(c.start(), Err(SessionError::AlreadyRunning));
        c.tick();
        c.tick();
        c.pause().unwrap();
        assert_eq!(c.snapshot().remaining_seconds, 8);
        c.tick();
        assert_eq!(c.snapshot().remaining_seconds, 8);
        assert_eq!(c.pause(), Err(SessionError::NotRunning));
    }

    #[test]
    fn test_tick_ignored_when_idle() {
        let mut c = controller(&[3], 10);
        c.tick();
        assert_eq!(c.snapshot().remaining_seconds, 10);
    }

    #[test]
    fn test_toggle_flips_running() {
        let mut c = controller(&[3], 10);
        c.toggle().unwrap();
        assert!(c.snapshot().is_running);
        c.toggle().unwrap();
        assert!(!c.snapshot().is_running);
    }

    #[test]
    fn test_expiry_fires_once_and_never_goes_negative() {
        let mut c = controller(&[3], 3);
        run_out(&mut c);
        assert_eq!(c.phase(), TimerPhase::Expired);

        c.tick();
        c.tick();
        assert_eq!(c.snapshot().remaining_seconds, 0);

        let effects = c.take_effects();
        assert_eq!(
            effects,
            vec![
                Effect::Vibrate(EXPIRY_VIBRATION),
                Effect::Prompt(Prompt::SetExpired { set: 1 }),
            ]
        );
        assert_eq!(c.start(), Err(SessionError::TimerExpired));
    }

    #[test]
    fn test_zero_duration_expires_on_first_tick() {
        let mut c = controller(&[3], 0);
        c.start().unwrap();
        c.tick();
        assert_eq!(c.phase(), TimerPhase::Expired);
        assert_eq!(c.snapshot().remaining_seconds, 0);
    }

    #[test]
    fn test_reset_restores_duration_from_any_state() {
        let mut c = controller(&[3], 10);
        c.reset().unwrap();
        assert_eq!(c.snapshot().remaining_seconds, 10);

        c.start().unwrap();
        c.tick();
        c.reset().unwrap();
        assert_eq!(c.snapshot().remaining_seconds, 10);
        assert!(!c.snapshot().is_running);

        run_out(&mut c);
        c.reset().unwrap();
        assert_eq!(c.snapshot().remaining_seconds, 10);
        assert_eq!(c.phase(), TimerPhase::Idle);
        assert_eq!(c.snapshot().current_set, 1);
    }

    #[test]
    fn test_next_set_increments_and_stops_timer() {
        let mut c = controller(&[2, 2], 10);
        c.start().unwrap();
        c.tick();
        c.next_set().unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.current_set, 2);
        assert_eq!(snap.remaining_seconds, 10);
        assert!(!snap.is_running);
    }

    #[test]
    fn test_next_set_on_last_set_advances_exercise() {
        let mut c = controller(&[2, 2], 10);
        c.next_set().unwrap();
        assert_eq!(c.snapshot().current_set, 2);

        c.next_set().unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.exercise_index, 1);
        assert_eq!(snap.current_set, 1);
        assert!(snap.is_running);

        let effects = c.take_effects();
        assert!(effects.contains(&Effect::Alert {
            title: "All sets complete!",
            message: "Moving to the next exercise.",
        }));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Navigate(Route::Exercise { params, auto_start: true }) if params.current_index == "1"
        )));
    }

    #[test]
    fn test_cooldown_triggers_on_third_set_once() {
        let mut c = controller(&[5], 10);
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.snapshot().current_set, 3);
        assert_eq!(c.phase(), TimerPhase::Cooldown);
        assert!(!c.snapshot().is_running);
        assert_eq!(c.snapshot().cooldown_remaining, Some(30));
        assert_eq!(c.next_set(), Err(SessionError::InCooldown));
        assert_eq!(c.start(), Err(SessionError::InCooldown));

        for _ in 0..30 {
            c.tick();
        }
        assert_eq!(c.phase(), TimerPhase::Idle);
        assert_eq!(c.snapshot().remaining_seconds, 10);

        let effects = c.take_effects();
        assert_eq!(
            effects
                .iter()
                .filter(|e| matches!(e, Effect::CooldownStarted { .. }))
                .count(),
            1
        );
        assert_eq!(effects.last(), Some(&Effect::CooldownFinished));

        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.snapshot().current_set, 5);
        assert_eq!(c.phase(), TimerPhase::Idle);
    }

    fn cooldowns_started(c: &mut ExerciseController) -> usize {
        c.take_effects()
            .iter()
            .filter(|e| matches!(e, Effect::CooldownStarted { .. }))
            .count()
    }

    fn finish_cooldown(c: &mut ExerciseController) {
        while c.phase() == TimerPhase::Cooldown {
            c.tick();
        }
    }

    #[test]
    fn test_cooldown_triggers_again_on_each_exercise() {
        let mut c = controller(&[4, 4], 10);
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.phase(), TimerPhase::Cooldown);
        finish_cooldown(&mut c);
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.snapshot().exercise_index, 1);
        assert_eq!(cooldowns_started(&mut c), 1);

        c.pause().unwrap();
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.snapshot().current_set, 3);
        assert_eq!(c.phase(), TimerPhase::Cooldown);
        assert_eq!(cooldowns_started(&mut c), 1);
        finish_cooldown(&mut c);

        // going back starts the first exercise over, cooldown included
        c.previous_exercise().unwrap();
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.phase(), TimerPhase::Cooldown);
        assert_eq!(cooldowns_started(&mut c), 1);
        finish_cooldown(&mut c);

        c.next_exercise().unwrap();
        c.pause().unwrap();
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.snapshot().exercise_index, 1);
        assert_eq!(c.phase(), TimerPhase::Cooldown);
        assert_eq!(cooldowns_started(&mut c), 1);
    }

    #[test]
    fn test_custom_cooldown_trigger_set() {
        let config = SessionConfig::new(10).with_cooldown_trigger_set(2);
        let mut c = ExerciseController::new(vec![ex("A", 4)], 0, config).unwrap();
        c.next_set().unwrap();
        assert_eq!(c.snapshot().current_set, 2);
        assert_eq!(c.phase(), TimerPhase::Cooldown);
        finish_cooldown(&mut c);

        c.next_set().unwrap();
        assert_eq!(c.snapshot().current_set, 3);
        assert_eq!(c.phase(), TimerPhase::Idle);
        assert_eq!(cooldowns_started(&mut c), 1);
    }

    #[test]
    fn test_no_cooldown_for_two_set_exercise() {
        let mut c = controller(&[2, 3], 10);
        c.next_set().unwrap();
        assert_eq!(c.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_zero_cooldown_returns_immediately() {
        let list = vec![ex("A", 4)];
        let config = SessionConfig::new(10).with_cooldown_time(0);
        let mut c = ExerciseController::new(list, 0, config).unwrap();
        c.next_set().unwrap();
        c.next_set().unwrap();
        assert_eq!(c.phase(), TimerPhase::Idle);
        let effects = c.take_effects();
        assert_eq!(
            effects,
            vec![Effect::CooldownStarted { seconds: 0 }, Effect::CooldownFinished]
        );
    }

    #[test]
    fn test_skip_set_has_no_cooldown() {
        let mut c = controller(&[4], 10);
        c.skip_set().unwrap();
        c.skip_set().unwrap();
        assert_eq!(c.snapshot().current_set, 3);
        assert_eq!(c.phase(), TimerPhase::Idle);
        assert!(c.take_effects().is_empty());
    }

    #[test]
    fn test_skip_on_final_set_stays_on_exercise() {
        let mut c = controller(&[1, 2], 10);
        c.skip_set().unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.exercise_index, 0);
        assert_eq!(snap.current_set, 1);
        assert_eq!(
            c.take_effects(),
            vec![Effect::Alert {
                title: "Workout Complete!",
                message: "You've completed all sets. Great job!",
            }]
        );
    }

    #[test]
    fn test_finishing_last_exercise_completes_workout() {
        let mut c = controller(&[1], 10);
        c.next_set().unwrap();
        assert_eq!(c.phase(), TimerPhase::Finished);
        let effects = c.take_effects();
        assert!(effects.contains(&Effect::WorkoutComplete));
        assert_eq!(effects.last(), Some(&Effect::Navigate(Route::Workout { goal: None })));
        assert_eq!(c.start(), Err(SessionError::WorkoutFinished));

        c.tick();
        assert_eq!(c.phase(), TimerPhase::Finished);
    }

    #[test]
    fn test_previous_exercise() {
        let mut c = controller(&[3, 3], 10);
        assert_eq!(c.previous_exercise(), Err(SessionError::NoPreviousExercise));

        c.next_exercise().unwrap();
        c.next_set().unwrap();
        c.take_effects();

        c.previous_exercise().unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.exercise_index, 0);
        assert_eq!(snap.current_set, 1);
        assert!(!snap.is_running);
        assert_eq!(
            c.take_effects(),
            vec![Effect::Navigate(Route::Exercise {
                params: HandoffParams::encode(c.exercises(), 0).unwrap(),
                auto_start: false,
            })]
        );
    }

    #[test]
    fn test_observers_see_changes_until_unsubscribed() {
        let mut c = controller(&[3], 10);
        let seen = Rc::new(Cell::new(0u32));
        let s = seen.clone();
        let id = c.subscribe(move |snap| s.set(snap.remaining_seconds));

        c.start().unwrap();
        c.tick();
        assert_eq!(seen.get(), 9);

        assert!(c.unsubscribe(id));
        assert!(!c.unsubscribe(id));
        c.tick();
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn test_never_running_and_in_cooldown() {
        let mut c = controller(&[4, 4], 2);
        for _ in 0..6 {
            let _ = c.start();
            c.tick();
            let snap = c.snapshot();
            assert!(!(snap.is_running && snap.is_in_cooldown));
            let _ = c.next_set();
            let snap = c.snapshot();
            assert!(!(snap.is_running && snap.is_in_cooldown));
        }
    }
}
