//! Workout sampling - random plans per goal

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};

use crate::error::InputError;
use crate::exercises::{Exercise, ExerciseTemplate, Goal};
use crate::handoff::HandoffParams;
use crate::navigation::Route;

/// Exercises per generated workout
pub const DEFAULT_PLAN_SIZE: usize = 5;

/// Routines keyed by goal key (`weightLoss`, `muscleGain`, ...)
#[derive(Debug, Clone, Default)]
pub struct WorkoutTable {
    routines: HashMap<String, Vec<Exercise>>,
}

impl WorkoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled-in routines for every [`Goal`]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for goal in Goal::all() {
            table.insert(
                goal.key(),
                goal.routine().iter().map(ExerciseTemplate::to_exercise).collect(),
            );
        }
        table
    }

    pub fn insert(&mut self, goal: impl Into<String>, routine: Vec<Exercise>) {
        self.routines.insert(goal.into(), routine);
    }

    pub fn routine(&self, goal: &str) -> Option<&[Exercise]> {
        self.routines.get(goal).map(Vec::as_slice)
    }
}

/// Draw `count` exercises for `goal`, independently and uniformly, with replacement.
pub fn sample<R: Rng + ?Sized>(
    goal: &str,
    table: &WorkoutTable,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Exercise>, InputError> {
    let routine = table
        .routine(goal)
        .ok_or_else(|| InputError::UnknownGoal(goal.to_string()))?;
    if routine.is_empty() {
        return Err(InputError::EmptyRoutine(goal.to_string()));
    }

    let picked: Vec<Exercise> = (0..count)
        .map(|_| routine[rng.gen_range(0..routine.len())].clone())
        .collect();
    debug!(
        "Sampled {} from {}: {:?}",
        count,
        goal,
        picked.iter().map(|e| e.name.as_str()).collect::<Vec<_>>()
    );
    Ok(picked)
}

/// State behind the workout selection screen
pub struct WorkoutPlanner {
    goal: Option<Goal>,
    table: WorkoutTable,
    plan: Vec<Exercise>,
}

impl WorkoutPlanner {
    pub fn new(goal: Option<Goal>, table: WorkoutTable) -> Self {
        Self {
            goal,
            table,
            plan: Vec::new(),
        }
    }

    pub fn goal(&self) -> Option<Goal> {
        self.goal
    }

    pub fn plan(&self) -> &[Exercise] {
        &self.plan
    }

    /// Replace the current plan with a fresh draw
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[Exercise], InputError> {
        let goal = self.goal.ok_or(InputError::MissingGoal)?;
        self.plan = sample(goal.key(), &self.table, DEFAULT_PLAN_SIZE, rng)?;
        info!("Generated {} workout with {} exercises", goal, self.plan.len());
        Ok(&self.plan)
    }

    /// Route to the first exercise of the plan. The timer waits for the user.
    pub fn start(&self) -> Result<Route, InputError> {
        if self.plan.is_empty() {
            return Err(InputError::NoWorkoutGenerated);
        }
        Ok(Route::Exercise {
            params: HandoffParams::encode(&self.plan, 0)?,
            auto_start: false,
        })
    }
}

/// Route for a single quick-start exercise
pub fn single_exercise_route(exercise: &Exercise) -> Result<Route, InputError> {
    Ok(Route::Exercise {
        params: HandoffParams::encode(std::slice::from_ref(exercise), 0)?,
        auto_start: false,
    })
}
