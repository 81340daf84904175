use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{Category, SetId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    #[error("exercise name cannot be empty")]
    EmptyExerciseName,

    #[error("weight must be a finite, non-negative number")]
    InvalidWeight,
}

/// One logged repetition/duration entry for one exercise on one date.
///
/// Exercise names are normalized to trimmed uppercase so that "squat" and
/// "SQUAT " always refer to the same exercise. The weight field is only
/// meaningful for `Category::Strength`; for every other category it is held
/// at 0.0 so aggregation can treat the stored value uniformly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetEntry {
    id: SetId,
    exercise: String,
    category: Category,
    weight: f64,
    reps: u32,
    date: NaiveDate,
    completed: bool,
    sort_order: u32,
    created_at: DateTime<Utc>,
}

impl SetEntry {
    /// Creates a new, not-yet-completed set entry.
    ///
    /// # Errors
    ///
    /// Returns `SetError::EmptyExerciseName` if the name is empty or
    /// whitespace-only, and `SetError::InvalidWeight` for negative or
    /// non-finite weights.
    pub fn new(
        id: SetId,
        exercise: impl Into<String>,
        category: Category,
        weight: f64,
        reps: u32,
        date: NaiveDate,
        sort_order: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SetError> {
        Self::from_persisted(
            id, exercise, category, weight, reps, date, false, sort_order, created_at,
        )
    }

    /// Rehydrate a set entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SetError` if the stored name or weight fail validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: SetId,
        exercise: impl Into<String>,
        category: Category,
        weight: f64,
        reps: u32,
        date: NaiveDate,
        completed: bool,
        sort_order: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SetError> {
        let exercise = normalize_exercise_name(exercise.into())?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(SetError::InvalidWeight);
        }

        Ok(Self {
            id,
            exercise,
            category,
            weight: effective_weight(category, weight),
            reps,
            date,
            completed,
            sort_order,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SetId {
        self.id
    }

    #[must_use]
    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Stored weight. Zero for every non-strength category by construction.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Repetitions for strength work, minutes for cardio, seconds otherwise.
    #[must_use]
    pub fn reps(&self) -> u32 {
        self.reps
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn sort_order(&self) -> u32 {
        self.sort_order
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Mark the set completed or not.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Correct the recorded weight/reps.
    ///
    /// The weight invariant is re-applied: non-strength entries stay at 0.0.
    ///
    /// # Errors
    ///
    /// Returns `SetError::InvalidWeight` for negative or non-finite weights.
    pub fn update_metrics(&mut self, weight: f64, reps: u32) -> Result<(), SetError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SetError::InvalidWeight);
        }
        self.weight = effective_weight(self.category, weight);
        self.reps = reps;
        Ok(())
    }
}

/// Trim and uppercase an exercise name, rejecting empty input.
///
/// # Errors
///
/// Returns `SetError::EmptyExerciseName` for empty or whitespace-only names.
pub fn normalize_exercise_name(raw: String) -> Result<String, SetError> {
    let name = raw.trim().to_uppercase();
    if name.is_empty() {
        return Err(SetError::EmptyExerciseName);
    }
    Ok(name)
}

fn effective_weight(category: Category, weight: f64) -> f64 {
    if category.uses_weight() { weight } else { 0.0 }
}
