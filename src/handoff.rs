//! Screen-to-screen handoff parameters
//!
//! The exercise screen receives its list as a JSON string plus a stringly
//! index, the same shape a router passes between screens.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::exercises::Exercise;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffParams {
    /// Serialized ordered list of exercises
    pub exercises: String,
    /// Serialized position in `exercises`
    pub current_index: String,
}

impl HandoffParams {
    pub fn new(exercises: impl Into<String>, current_index: impl Into<String>) -> Self {
        Self {
            exercises: exercises.into(),
            current_index: current_index.into(),
        }
    }

    /// Serialize a list for handoff
    pub fn encode(exercises: &[Exercise], current_index: usize) -> Result<Self, InputError> {
        let exercises = serde_json::to_string(exercises).map_err(InputError::Encode)?;
        Ok(Self {
            exercises,
            current_index: current_index.to_string(),
        })
    }

    /// Same list, different position. The exercises payload is passed on unchanged.
    pub fn with_index(&self, current_index: usize) -> Self {
        Self {
            exercises: self.exercises.clone(),
            current_index: current_index.to_string(),
        }
    }

    /// Parse and validate. No clamping: anything off is an error.
    pub fn decode(&self) -> Result<(Vec<Exercise>, usize), InputError> {
        if self.exercises.trim().is_empty() {
            return Err(InputError::MissingExercises);
        }

        let exercises: Vec<Exercise> = serde_json::from_str(&self.exercises)?;
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

        let index: usize = self
            .current_index
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidIndex(self.current_index.clone()))?;
        if index >= exercises.len() {
            return Err(InputError::IndexOutOfBounds {
                index,
                len: exercises.len(),
            });
        }

        Ok((exercises, index))
    }
}
