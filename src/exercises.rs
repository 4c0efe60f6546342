//! Exercise definitions - built-in routines per goal

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A single exercise as shown on the exercise screen. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub description: String,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            description: description.into(),
        }
    }

    /// Reason this record can't be used in a session, if any
    pub(crate) fn defect(&self) -> Option<&'static str> {
        if self.sets == 0 {
            Some("sets must be positive")
        } else if self.reps == 0 {
            Some("reps must be positive")
        } else {
            None
        }
    }
}

/// Static form of [`Exercise`] for the compiled-in tables
#[derive(Debug, Clone, Copy)]
pub struct ExerciseTemplate {
    pub name: &'static str,
    pub sets: u32,
    pub reps: u32,
    pub description: &'static str,
}

impl ExerciseTemplate {
    pub fn to_exercise(&self) -> Exercise {
        Exercise::new(self.name, self.sets, self.reps, self.description)
    }
}

/// Fitness goal, selects which routine to sample from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
}

impl Goal {
    /// Key used in handoff parameters and routine tables
    pub fn key(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weightLoss",
            Goal::MuscleGain => "muscleGain",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss Routine",
            Goal::MuscleGain => "Muscle Gain Routine",
        }
    }

    pub fn all() -> &'static [Goal] {
        &[Goal::WeightLoss, Goal::MuscleGain]
    }

    pub fn routine(&self) -> &'static [ExerciseTemplate] {
        match self {
            Goal::WeightLoss => WEIGHT_LOSS,
            Goal::MuscleGain => MUSCLE_GAIN,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Goal {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::all()
            .iter()
            .copied()
            .find(|g| g.key() == s)
            .ok_or_else(|| InputError::UnknownGoal(s.to_string()))
    }
}

pub const WEIGHT_LOSS: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Jumping Jacks", sets: 3, reps: 30, description: "A full-body cardio exercise to burn calories." },
    ExerciseTemplate { name: "Push-ups", sets: 3, reps: 15, description: "Strengthen your upper body and core." },
    ExerciseTemplate { name: "Burpees", sets: 3, reps: 10, description: "A high-intensity full-body workout to boost metabolism." },
    ExerciseTemplate { name: "Mountain Climbers", sets: 3, reps: 30, description: "Cardio exercise that targets your core and legs." },
    ExerciseTemplate { name: "High Knees", sets: 3, reps: 40, description: "Boosts heart rate and works your legs and core." },
    ExerciseTemplate { name: "Lunges", sets: 3, reps: 12, description: "A lower body exercise that improves balance and endurance." },
    ExerciseTemplate { name: "Skater Jumps", sets: 3, reps: 20, description: "A dynamic movement that targets the legs and glutes." },
    ExerciseTemplate { name: "Plank", sets: 3, reps: 30, description: "Core stability exercise (hold for 30 seconds per set)." },
    ExerciseTemplate { name: "Box Jumps", sets: 3, reps: 12, description: "Explosive lower body movement to improve strength and agility." },
    ExerciseTemplate { name: "Bicycle Crunches", sets: 3, reps: 20, description: "Core exercise targeting the abs and obliques." },
];

pub const MUSCLE_GAIN: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Squats", sets: 4, reps: 12, description: "Strengthens your lower body, including quads, hamstrings, and glutes." },
    ExerciseTemplate { name: "Bench Press", sets: 4, reps: 8, description: "Targets the chest, shoulders, and triceps." },
    ExerciseTemplate { name: "Deadlifts", sets: 4, reps: 10, description: "Works on your back, hamstrings, and glutes." },
    ExerciseTemplate { name: "Pull-ups", sets: 3, reps: 8, description: "A bodyweight exercise that targets your back and biceps." },
    ExerciseTemplate { name: "Overhead Press", sets: 4, reps: 8, description: "Works the shoulders, upper chest, and triceps." },
];

/// Quick-start exercises offered on the home screen
pub const DEMO_EXERCISES: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Push Ups", sets: 3, reps: 12, description: "Strengthen your chest, shoulders, and arms." },
    ExerciseTemplate { name: "Squats", sets: 4, reps: 15, description: "A lower body workout for legs and glutes." },
    ExerciseTemplate { name: "Plank", sets: 3, reps: 30, description: "Core stability exercise (30 seconds per set)." },
];

pub fn get_demo_exercises() -> Vec<Exercise> {
    DEMO_EXERCISES.iter().map(ExerciseTemplate::to_exercise).collect()
}
