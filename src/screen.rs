//! Exercise screen binding
//!
//! Glues an [`ExerciseController`] to a [`Ticker`]: subscribes to ticks only
//! while the session is counting (set timer or cooldown) and drops the
//! subscription when the screen goes away.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::clock::{TickHandle, Ticker};
use crate::error::{InputError, SessionError};
use crate::handoff::HandoffParams;
use crate::session::{Effect, ExerciseController, PromptChoice, SessionConfig, SessionSnapshot};

pub struct ExerciseScreen {
    controller: Rc<RefCell<ExerciseController>>,
    ticker: Rc<dyn Ticker>,
    ticks: Option<TickHandle>,
}

impl ExerciseScreen {
    /// Open a screen from router parameters. Bad parameters are reported,
    /// never clamped, and no countdown starts.
    pub fn open(
        params: &HandoffParams,
        auto_start: bool,
        config: SessionConfig,
        ticker: Rc<dyn Ticker>,
    ) -> Result<Self, InputError> {
        let controller = ExerciseController::from_handoff(params, config)?;
        let mut screen = Self::new(controller, ticker);
        if auto_start {
            // a fresh session is always idle, start can't be rejected
            let _ = screen.command(ExerciseController::start);
        }
        Ok(screen)
    }

    pub fn new(controller: ExerciseController, ticker: Rc<dyn Ticker>) -> Self {
        let mut screen = Self {
            controller: Rc::new(RefCell::new(controller)),
            ticker,
            ticks: None,
        };
        screen.sync_ticks();
        screen
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.controller.borrow().snapshot()
    }

    pub fn take_effects(&self) -> Vec<Effect> {
        self.controller.borrow_mut().take_effects()
    }

    /// Run a controller command, then bring the tick subscription in line
    pub fn command(
        &mut self,
        f: impl FnOnce(&mut ExerciseController) -> Result<(), SessionError>,
    ) -> Result<(), SessionError> {
        let result = f(&mut *self.controller.borrow_mut());
        self.sync_ticks();
        result
    }

    /// Answer the "Time is up!" prompt
    pub fn choose(&mut self, choice: PromptChoice) -> Result<(), SessionError> {
        match choice {
            PromptChoice::NextSet => self.command(ExerciseController::next_set),
            PromptChoice::ResetTimer => self.command(ExerciseController::reset),
        }
    }

    /// Subscribe while ticks matter, cancel otherwise.
    /// Call after the clock has delivered ticks.
    pub fn sync_ticks(&mut self) {
        let wants = self.controller.borrow().wants_ticks();
        match (wants, self.ticks.is_some()) {
            (true, false) => {
                let controller = self.controller.clone();
                self.ticks = Some(
                    self.ticker
                        .on_every_second(Box::new(move || controller.borrow_mut().tick())),
                );
                debug!("Tick subscription opened");
            }
            (false, true) => {
                self.ticks = None;
                debug!("Tick subscription released");
            }
            _ => {}
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticks.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::exercises::Exercise;
    use crate::navigation::Route;
    use crate::session::{Prompt, TimerPhase};

    fn two_exercises() -> HandoffParams {
        HandoffParams::encode(
            &[
                Exercise::new("Burpees", 3, 10, "Full body"),
                Exercise::new("Lunges", 2, 12, "Legs"),
            ],
            0,
        )
        .unwrap()
    }

    fn open(clock: &Rc<ManualClock>, params: &HandoffParams, auto_start: bool) -> ExerciseScreen {
        let config = SessionConfig::new(5).with_cooldown_time(4);
        ExerciseScreen::open(params, auto_start, config, clock.clone()).unwrap()
    }

    /// Start the set, let it run out and answer "Next Set"
    fn finish_set(screen: &mut ExerciseScreen, clock: &ManualClock) {
        screen.command(ExerciseController::start).unwrap();
        clock.advance(5);
        screen.sync_ticks();
        let effects = screen.take_effects();
        assert!(effects.iter().any(|e| matches!(e, Effect::Prompt(Prompt::SetExpired { .. }))));
        screen.choose(PromptChoice::NextSet).unwrap();
    }

    #[test]
    fn test_open_rejects_bad_params() {
        let clock = Rc::new(ManualClock::new());
        let config = SessionConfig::new(5);
        let params = HandoffParams::new("[]", "0");
        assert!(ExerciseScreen::open(&params, true, config, clock.clone()).is_err());
        assert_eq!(clock.active_subscriptions(), 0);
    }

    #[test]
    fn test_idle_screen_does_not_tick() {
        let clock = Rc::new(ManualClock::new());
        let screen = open(&clock, &two_exercises(), false);
        clock.advance(3);
        assert_eq!(screen.snapshot().remaining_seconds, 5);
        assert!(!screen.is_ticking());
    }

    #[test]
    fn test_auto_start_counts_down() {
        let clock = Rc::new(ManualClock::new());
        let screen = open(&clock, &two_exercises(), true);
        clock.advance(2);
        assert_eq!(screen.snapshot().remaining_seconds, 3);
    }

    #[test]
    fn test_pause_releases_subscription() {
        let clock = Rc::new(ManualClock::new());
        let mut screen = open(&clock, &two_exercises(), true);
        clock.advance(1);
        screen.command(ExerciseController::pause).unwrap();
        assert_eq!(clock.active_subscriptions(), 0);
        clock.advance(3);
        assert_eq!(screen.snapshot().remaining_seconds, 4);
    }

    #[test]
    fn test_dropping_screen_cancels_ticks() {
        let clock = Rc::new(ManualClock::new());
        let screen = open(&clock, &two_exercises(), true);
        drop(screen);
        clock.advance(1);
        assert_eq!(clock.active_subscriptions(), 0);
    }

    #[test]
    fn test_expiry_prompt_reset_choice() {
        let clock = Rc::new(ManualClock::new());
        let mut screen = open(&clock, &two_exercises(), true);
        clock.advance(7);
        screen.sync_ticks();
        assert_eq!(screen.snapshot().phase, TimerPhase::Expired);
        assert_eq!(screen.snapshot().remaining_seconds, 0);
        assert!(!screen.is_ticking());

        screen.choose(PromptChoice::ResetTimer).unwrap();
        let snap = screen.snapshot();
        assert_eq!(snap.remaining_seconds, 5);
        assert_eq!(snap.current_set, 1);
        assert_eq!(snap.phase, TimerPhase::Idle);
    }

    #[test]
    fn test_full_two_exercise_flow() {
        let clock = Rc::new(ManualClock::new());
        let mut screen = open(&clock, &two_exercises(), false);

        finish_set(&mut screen, &clock);
        assert_eq!(screen.snapshot().current_set, 2);

        // set 3 starts with a cooldown
        finish_set(&mut screen, &clock);
        let snap = screen.snapshot();
        assert_eq!(snap.current_set, 3);
        assert!(snap.is_in_cooldown);
        assert!(screen.is_ticking());

        clock.advance(4);
        screen.sync_ticks();
        let snap = screen.snapshot();
        assert!(!snap.is_in_cooldown);
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert!(screen.take_effects().contains(&Effect::CooldownFinished));

        // last set of exercise 1 hands over to exercise 2, already running
        finish_set(&mut screen, &clock);
        let snap = screen.snapshot();
        assert_eq!(snap.exercise.name, "Lunges");
        assert_eq!(snap.current_set, 1);
        assert!(snap.is_running);
        assert!(screen.take_effects().iter().any(|e| matches!(
            e,
            Effect::Navigate(Route::Exercise { auto_start: true, .. })
        )));

        clock.advance(1);
        assert_eq!(screen.snapshot().remaining_seconds, 4);

        // going back gives a stopped timer
        screen.command(ExerciseController::previous_exercise).unwrap();
        clock.advance(3);
        let snap = screen.snapshot();
        assert_eq!(snap.exercise.name, "Burpees");
        assert_eq!(snap.remaining_seconds, 5);
        assert!(!snap.is_running);

        screen.command(ExerciseController::start).unwrap();
        clock.advance(1);
        assert_eq!(screen.snapshot().remaining_seconds, 4);
    }

    #[test]
    fn test_workout_completes_after_last_exercise() {
        let clock = Rc::new(ManualClock::new());
        let params = HandoffParams::encode(&[Exercise::new("Plank", 1, 30, "Core")], 0).unwrap();
        let mut screen = open(&clock, &params, false);

        finish_set(&mut screen, &clock);
        assert_eq!(screen.snapshot().phase, TimerPhase::Finished);
        assert!(!screen.is_ticking());
        let effects = screen.take_effects();
        assert!(effects.contains(&Effect::WorkoutComplete));
        assert!(effects.contains(&Effect::Navigate(Route::Workout { goal: None })));
    }
}
