//! Progress statistics over logged sets.
//!
//! Everything in this module is a pure function of its inputs: the caller
//! fetches the full set history and the aggregator filters and folds it.
//! Absence of data is always an explicit empty value, never an error.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::model::{Category, SetEntry};

/// Time window selector for exercise summaries.
///
/// `Session` is anchored on the viewed day; `Month` and `Year` are trailing
/// windows anchored on the wall clock, matching the recorded behavior of the
/// stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Window {
    Session,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWindowError {
    raw: String,
}

impl std::fmt::Display for ParseWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown window: {}", self.raw)
    }
}

impl std::error::Error for ParseWindowError {}

impl FromStr for Window {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SESSION" => Ok(Window::Session),
            "MONTH" => Ok(Window::Month),
            "YEAR" => Ok(Window::Year),
            other => Err(ParseWindowError {
                raw: other.to_string(),
            }),
        }
    }
}

/// Summary statistics for one exercise over a time window.
///
/// `total_volume` is weight x reps summed over the window, so it is a
/// physical volume only for strength work; for timed categories the reps
/// field holds a duration and the total is a duration sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSummary {
    pub max_weight: f64,
    pub total_volume: f64,
    pub total_sets: u32,
    pub category: Category,
}

impl ExerciseSummary {
    /// The zero-valued summary returned when nothing matches the window.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            max_weight: 0.0,
            total_volume: 0.0,
            total_sets: 0,
            category: Category::Strength,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_sets == 0
    }
}

/// Per-day metrics used by the latest-vs-previous comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayMetrics {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub total_reps: u32,
    pub category: Category,
}

/// Latest and previous workout-day metrics for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionComparison {
    pub latest: DayMetrics,
    pub previous: Option<DayMetrics>,
    pub improved: bool,
}

/// Compute summary statistics for one exercise.
///
/// Only completed sets count. `reference_date` anchors the `Session` window;
/// the `Month`/`Year` windows trail from `now`.
#[must_use]
pub fn summarize(
    sets: &[SetEntry],
    exercise: &str,
    window: Window,
    reference_date: NaiveDate,
    now: DateTime<Utc>,
) -> ExerciseSummary {
    let today = now.date_naive();
    let filtered: Vec<&SetEntry> = sets
        .iter()
        .filter(|s| s.is_completed() && s.exercise() == exercise)
        .filter(|s| match window {
            Window::Session => s.date() == reference_date,
            Window::Month => s.date() >= months_back(today, 1),
            Window::Year => s.date() >= months_back(today, 12),
        })
        .collect();

    let Some(first) = filtered.first() else {
        return ExerciseSummary::empty();
    };

    ExerciseSummary {
        max_weight: filtered.iter().fold(0.0, |acc, s| acc.max(s.weight())),
        total_volume: filtered
            .iter()
            .map(|s| s.weight() * f64::from(s.reps()))
            .sum(),
        total_sets: u32::try_from(filtered.len()).unwrap_or(u32::MAX),
        category: first.category(),
    }
}

/// Compare the two most recent workout days for one exercise.
///
/// Dates are taken across all time, independent of the summary window.
/// Returns `None` when the exercise has no completed sets at all;
/// `previous` is `None` when only a single workout day exists.
#[must_use]
pub fn compare_sessions(sets: &[SetEntry], exercise: &str) -> Option<SessionComparison> {
    let completed: Vec<&SetEntry> = sets
        .iter()
        .filter(|s| s.is_completed() && s.exercise() == exercise)
        .collect();

    let mut dates: Vec<NaiveDate> = completed.iter().map(|s| s.date()).collect();
    dates.sort_unstable();
    dates.dedup();
    // ISO dates are fixed-width and zero-padded, so chronological descending
    // order matches the lexicographic ordering the history view relies on.
    dates.reverse();

    let latest = day_metrics(&completed, *dates.first()?)?;
    let previous = dates.get(1).and_then(|d| day_metrics(&completed, *d));

    let improved = previous.as_ref().is_some_and(|prev| {
        if latest.category == Category::Strength {
            latest.max_weight > prev.max_weight
        } else {
            latest.total_reps > prev.total_reps
        }
    });

    Some(SessionComparison {
        latest,
        previous,
        improved,
    })
}

/// Maximum reps/duration across all completed sets of one exercise.
#[must_use]
pub fn overall_max_reps(sets: &[SetEntry], exercise: &str) -> u32 {
    sets.iter()
        .filter(|s| s.is_completed() && s.exercise() == exercise)
        .map(SetEntry::reps)
        .max()
        .unwrap_or(0)
}

fn day_metrics(completed: &[&SetEntry], date: NaiveDate) -> Option<DayMetrics> {
    let day_sets: Vec<&&SetEntry> = completed.iter().filter(|s| s.date() == date).collect();
    let first = day_sets.first()?;

    Some(DayMetrics {
        date,
        max_weight: day_sets.iter().fold(0.0, |acc, s| acc.max(s.weight())),
        total_reps: day_sets
            .iter()
            .fold(0_u32, |acc, s| acc.saturating_add(s.reps())),
        category: first.category(),
    })
}

fn months_back(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}
