//! TUI module - Terminal front-end with ratatui
//!
//! Acts as the router and renderer for the core: it opens screens for
//! routes, feeds ticks from a [`SystemClock`] and performs the effects the
//! exercise controller asks for.

mod form;
mod views;

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::prelude::*;
use std::io::{Stdout, Write, stdout};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::auth::{LOGIN_DELAY_SECS, PendingLogin};
use crate::clock::{SystemClock, Ticker};
use crate::error::InputError;
use crate::exercises::{Exercise, Goal, get_demo_exercises};
use crate::navigation::Route;
use crate::screen::ExerciseScreen;
use crate::session::{Effect, ExerciseController, Prompt, PromptChoice, SessionConfig};
use crate::workout::{WorkoutPlanner, WorkoutTable, single_exercise_route};

use form::{Form, FormAction};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Longest wait for input when nothing is counting down
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Message line shown under the current screen
struct Notice {
    title: String,
    message: String,
}

impl Notice {
    fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

enum Screen {
    Introduction,
    Login(Form),
    Signup(Form),
    Home { selected: usize },
    Workout(WorkoutPlanner),
    Exercise(ExerciseScreen),
    /// Exercise screen opened with unusable parameters
    ExerciseError(InputError),
}

/// App state for TUI
pub struct App {
    config: SessionConfig,
    clock: Rc<SystemClock>,
    table: WorkoutTable,
    rng: StdRng,
    route: Route,
    screen: Screen,
    prompt: Option<Prompt>,
    notice: Option<Notice>,
    pending_login: Option<PendingLogin>,
    demo: Vec<Exercise>,
    workout_started: Option<DateTime<Local>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: SessionConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            clock: Rc::new(SystemClock::new()),
            table: WorkoutTable::builtin(),
            rng,
            route: Route::Introduction,
            screen: Screen::Introduction,
            prompt: None,
            notice: None,
            pending_login: None,
            demo: get_demo_exercises(),
            workout_started: None,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| views::render(self, frame))?;

            let timeout = self
                .clock
                .next_deadline()
                .map(|due| due.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL)
                .min(IDLE_POLL);

            if event::poll(timeout)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            self.clock.pump();
            self.after_ticks();
        }
        Ok(())
    }

    fn after_ticks(&mut self) {
        if let Screen::Exercise(screen) = &mut self.screen {
            screen.sync_ticks();
        }
        self.finish_login();
        self.process_effects();
    }

    fn finish_login(&mut self) {
        let Some(outcome) = self.pending_login.as_ref().and_then(PendingLogin::poll) else {
            return;
        };
        self.pending_login = None;
        match outcome {
            Ok(route) => self.navigate(route),
            Err(e) => {
                if let Screen::Login(form) = &mut self.screen {
                    form.error = Some(e);
                }
            }
        }
    }

    fn is_logging_in(&self) -> bool {
        self.pending_login.is_some()
    }

    // --- Routing ---

    pub fn navigate(&mut self, route: Route) {
        debug!("Navigate to {}", route.path());
        self.prompt = None;
        self.notice = None;
        self.pending_login = None;
        self.screen = match &route {
            Route::Introduction => Screen::Introduction,
            Route::Login => Screen::Login(Form::login()),
            Route::Signup => Screen::Signup(Form::signup()),
            Route::Home => Screen::Home { selected: 0 },
            Route::Workout { goal } => Screen::Workout(WorkoutPlanner::new(*goal, self.table.clone())),
            Route::Exercise { params, auto_start } => {
                let ticker: Rc<dyn Ticker> = self.clock.clone();
                match ExerciseScreen::open(params, *auto_start, self.config, ticker) {
                    Ok(screen) => Screen::Exercise(screen),
                    Err(e) => {
                        warn!("Exercise screen refused its parameters: {}", e);
                        Screen::ExerciseError(e)
                    }
                }
            }
        };
        self.route = route;
    }

    /// Open an exercise route that begins a new workout
    fn begin_workout(&mut self, route: Result<Route, InputError>) {
        match route {
            Ok(route) => {
                self.workout_started = Some(Local::now());
                self.navigate(route);
            }
            Err(e) => self.notice = Some(Notice::new("No Work", e.to_string())),
        }
    }

    // --- Input ---

    fn handle_key(&mut self, code: KeyCode) {
        match &mut self.screen {
            Screen::Introduction => match code {
                KeyCode::Char('l') => self.navigate(Route::Login),
                KeyCode::Char('s') => self.navigate(Route::Signup),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },

            Screen::Login(form) => {
                if self.pending_login.is_some() {
                    if code == KeyCode::Esc {
                        debug!("Login cancelled");
                        self.pending_login = None;
                    }
                    return;
                }
                match form.handle_key(code) {
                    FormAction::Submit => {
                        form.error = None;
                        let pending = PendingLogin::start(form.credentials(), LOGIN_DELAY_SECS, &*self.clock);
                        self.pending_login = Some(pending);
                    }
                    FormAction::Cancel => self.navigate(Route::Introduction),
                    FormAction::None => {}
                }
            }

            Screen::Signup(form) => match form.handle_key(code) {
                FormAction::Submit => match form.signup_form().validate() {
                    Ok(route) => self.navigate(route),
                    Err(e) => form.error = Some(e),
                },
                FormAction::Cancel => self.navigate(Route::Introduction),
                FormAction::None => {}
            },

            Screen::Home { selected } => {
                let entries = Goal::all().len() + self.demo.len();
                match code {
                    KeyCode::Up => *selected = (*selected + entries - 1) % entries,
                    KeyCode::Down => *selected = (*selected + 1) % entries,
                    KeyCode::Enter => {
                        let selected = *selected;
                        if let Some(goal) = Goal::all().get(selected) {
                            self.navigate(Route::Workout { goal: Some(*goal) });
                        } else if let Some(exercise) = self.demo.get(selected - Goal::all().len()) {
                            let route = single_exercise_route(exercise);
                            self.begin_workout(route);
                        }
                    }
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
            }

            Screen::Workout(planner) => match code {
                KeyCode::Char('g') => {
                    if let Err(e) = planner.generate(&mut self.rng) {
                        self.notice = Some(Notice::new("Error", e.to_string()));
                    }
                }
                KeyCode::Enter | KeyCode::Char('s') => {
                    let route = planner.start();
                    self.begin_workout(route);
                }
                KeyCode::Esc | KeyCode::Char('b') => self.navigate(Route::Home),
                _ => {}
            },

            Screen::Exercise(screen) => {
                if code == KeyCode::Esc {
                    self.navigate(Route::Home);
                    return;
                }

                let result = match (self.prompt, code) {
                    (Some(_), KeyCode::Char('n')) => {
                        self.prompt = None;
                        screen.choose(PromptChoice::NextSet)
                    }
                    (Some(_), KeyCode::Char('r')) => {
                        self.prompt = None;
                        screen.choose(PromptChoice::ResetTimer)
                    }
                    (Some(_), _) => Ok(()),
                    (None, KeyCode::Char(' ')) => screen.command(ExerciseController::toggle),
                    (None, KeyCode::Char('r')) => screen.command(ExerciseController::reset),
                    (None, KeyCode::Char('n')) => screen.command(ExerciseController::next_set),
                    (None, KeyCode::Char('k')) => screen.command(ExerciseController::skip_set),
                    (None, KeyCode::Right) => screen.command(ExerciseController::next_exercise),
                    (None, KeyCode::Left) => screen.command(ExerciseController::previous_exercise),
                    _ => Ok(()),
                };
                if let Err(e) = result {
                    debug!("Command rejected: {}", e);
                    self.notice = Some(Notice::new("", e.to_string()));
                }
                self.process_effects();
            }

            Screen::ExerciseError(_) => {
                if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                    self.navigate(Route::Home);
                }
            }
        }
    }

    // --- Effects ---

    /// Notices raised in a batch outlive a navigation from the same batch
    fn process_effects(&mut self) {
        let effects = match &self.screen {
            Screen::Exercise(screen) => screen.take_effects(),
            _ => return,
        };

        let mut fresh = None;
        for effect in effects {
            match effect {
                Effect::Vibrate(duration) => {
                    debug!("Vibrate for {:?}", duration);
                    ring_bell();
                }
                Effect::Prompt(prompt) => self.prompt = Some(prompt),
                Effect::Alert { title, message } => fresh = Some(Notice::new(title, message)),
                Effect::CooldownStarted { seconds } => {
                    fresh = Some(Notice::new("Cooldown", format!("Take {}s to recover", seconds)))
                }
                Effect::CooldownFinished => fresh = Some(Notice::new("Cooldown", "Back to work!")),
                Effect::WorkoutComplete => {
                    if let Some(started) = self.workout_started.take() {
                        let took = Local::now() - started;
                        fresh = Some(Notice::new(
                            "Workout Complete!",
                            format!(
                                "Finished at {} after {}m {}s",
                                Local::now().format("%H:%M"),
                                took.num_minutes(),
                                took.num_seconds() % 60
                            ),
                        ));
                    }
                }
                Effect::Navigate(route) => self.navigate(route),
            }
        }
        if fresh.is_some() {
            self.notice = fresh;
        }
    }
}

fn ring_bell() {
    let mut out = stdout();
    if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
        error!("Failed to ring bell: {}", e);
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
