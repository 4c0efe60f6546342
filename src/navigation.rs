//! Navigation intents
//!
//! The core never switches screens itself. It emits a [`Route`] and the
//! router (the front-end) decides what to show.

use crate::exercises::Goal;
use crate::handoff::HandoffParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Introduction,
    Login,
    Signup,
    Home,
    /// Workout selection. `None` when returning after a finished workout.
    Workout { goal: Option<Goal> },
    Exercise {
        params: HandoffParams,
        /// Start the timer as soon as the screen opens
        auto_start: bool,
    },
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Introduction => "/introduction",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Home => "/",
            Route::Workout { .. } => "/workout",
            Route::Exercise { .. } => "/exercise",
        }
    }
}
