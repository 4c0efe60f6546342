//! fitness-buddy - Goal-based workouts with a set timer and cooldowns
//!
//! The core is a set of single-threaded state machines driven by
//! one-second ticks and user commands. Rendering and routing live in the
//! `tui` front-end.

pub mod auth;
pub mod clock;
pub mod error;
pub mod exercises;
pub mod handoff;
pub mod navigation;
pub mod screen;
pub mod session;
pub mod tui;
pub mod workout;

pub use error::{InputError, SessionError, ValidationError};
pub use session::{ExerciseController, SessionConfig};
