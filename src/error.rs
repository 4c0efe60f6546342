//! Error taxonomy
//!
//! None of these are fatal: every failure is shown to the user and the
//! screen stays usable (or, for input errors, renders an error state).

use thiserror::Error;

/// Malformed or out-of-range data handed to a screen
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No exercises data provided")]
    MissingExercises,
    #[error("Error parsing exercises: {0}")]
    MalformedExercises(#[from] serde_json::Error),
    #[error("Invalid exercise at position {position}: {reason}")]
    InvalidExercise { position: usize, reason: &'static str },
    #[error("Exercise list is empty")]
    EmptyExerciseList,
    #[error("Exercise index is not a number: {0:?}")]
    InvalidIndex(String),
    #[error("Exercise index {index} out of bounds (list has {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Invalid goal selected: {0:?}")]
    UnknownGoal(String),
    #[error("No goal selected")]
    MissingGoal,
    #[error("Routine for goal {0:?} has no exercises")]
    EmptyRoutine(String),
    #[error("No workout generated yet")]
    NoWorkoutGenerated,
    #[error("Failed to encode exercises: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Form validation failures on the login and signup screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter Username and Password")]
    MissingCredentials,
    #[error("Invalid credentials, Please check your username and password")]
    InvalidCredentials,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter a valid email")]
    InvalidEmail,
}

/// A user command the session cannot honour in its current state.
/// Rejected commands leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Timer is already running")]
    AlreadyRunning,
    #[error("Timer is not running")]
    NotRunning,
    #[error("Time is up, choose next set or reset")]
    TimerExpired,
    #[error("Cooldown in progress")]
    InCooldown,
    #[error("Already at the first exercise")]
    NoPreviousExercise,
    #[error("Workout already finished")]
    WorkoutFinished,
}
