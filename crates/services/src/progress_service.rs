use std::sync::Arc;

use chrono::NaiveDate;

use storage::repository::SetRepository;
use track_core::model::{SetEntry, normalize_exercise_name};
use track_core::stats::{self, ExerciseSummary, SessionComparison, Window};

use crate::Clock;
use crate::error::ProgressServiceError;

/// Read-only statistics over the full set history.
///
/// The repository hands back the complete history and the pure aggregator in
/// the core crate does the filtering, matching how the stats view consumes a
/// single master list.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    sets: Arc<dyn SetRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, sets: Arc<dyn SetRepository>) -> Self {
        Self { clock, sets }
    }

    /// Summary statistics for one exercise over a window.
    ///
    /// `reference_date` anchors the session window; month and year windows
    /// trail from the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Set` for an invalid exercise name and
    /// `ProgressServiceError::Storage` if repository access fails.
    pub async fn exercise_summary(
        &self,
        exercise: &str,
        window: Window,
        reference_date: NaiveDate,
    ) -> Result<ExerciseSummary, ProgressServiceError> {
        let name = normalize_exercise_name(exercise.to_owned())?;
        let sets = self.sets.list_all().await?;
        Ok(stats::summarize(
            &sets,
            &name,
            window,
            reference_date,
            self.clock.now(),
        ))
    }

    /// Latest-vs-previous workout-day comparison for one exercise.
    ///
    /// Returns `Ok(None)` when the exercise has no completed sets.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Set` for an invalid exercise name and
    /// `ProgressServiceError::Storage` if repository access fails.
    pub async fn session_comparison(
        &self,
        exercise: &str,
    ) -> Result<Option<SessionComparison>, ProgressServiceError> {
        let name = normalize_exercise_name(exercise.to_owned())?;
        let sets = self.sets.list_all().await?;
        Ok(stats::compare_sessions(&sets, &name))
    }

    /// Highest reps/duration across all completed sets of one exercise.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Set` for an invalid exercise name and
    /// `ProgressServiceError::Storage` if repository access fails.
    pub async fn overall_max_reps(&self, exercise: &str) -> Result<u32, ProgressServiceError> {
        let name = normalize_exercise_name(exercise.to_owned())?;
        let sets = self.sets.list_all().await?;
        Ok(stats::overall_max_reps(&sets, &name))
    }

    /// Distinct exercise names with at least one completed set, sorted.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn exercise_names(&self) -> Result<Vec<String>, ProgressServiceError> {
        let sets = self.sets.list_all().await?;
        let mut names: Vec<String> = sets
            .iter()
            .filter(|s| s.is_completed())
            .map(|s| s.exercise().to_owned())
            .collect();
        names.sort_unstable();
        names.dedup();
        Ok(names)
    }

    /// Autocomplete candidates: completed exercise names containing the
    /// query, case-insensitive. An empty query yields no suggestions.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>, ProgressServiceError> {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let names = self.exercise_names().await?;
        Ok(names.into_iter().filter(|n| n.contains(&needle)).collect())
    }

    /// Most recently created set of one exercise, if any, for input prefill.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Set` for an invalid exercise name and
    /// `ProgressServiceError::Storage` if repository access fails.
    pub async fn last_entry(
        &self,
        exercise: &str,
    ) -> Result<Option<SetEntry>, ProgressServiceError> {
        let name = normalize_exercise_name(exercise.to_owned())?;
        let sets = self.sets.list_all().await?;
        Ok(sets.into_iter().find(|s| s.exercise() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::{InMemoryRepository, NewSetRecord};
    use track_core::model::Category;
    use track_core::time::fixed_now;

    fn record(exercise: &str, date: &str, weight: f64, reps: u32, completed: bool) -> NewSetRecord {
        NewSetRecord {
            exercise: exercise.to_owned(),
            category: Category::Strength,
            weight,
            reps,
            date: date.parse().unwrap(),
            completed,
            sort_order: 0,
            created_at: fixed_now(),
        }
    }

    async fn service_with(records: &[NewSetRecord]) -> ProgressService {
        let repo = InMemoryRepository::new();
        storage::repository::SetRepository::insert_sets(&repo, records)
            .await
            .unwrap();
        ProgressService::new(Clock::Fixed(fixed_now()), Arc::new(repo))
    }

    #[tokio::test]
    async fn summary_ignores_incomplete_sets() {
        let service = service_with(&[
            record("SQUAT", "2023-11-14", 100.0, 5, true),
            record("SQUAT", "2023-11-14", 120.0, 3, false),
        ])
        .await;

        let summary = service
            .exercise_summary("squat", Window::Session, "2023-11-14".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(summary.total_sets, 1);
        assert!((summary.max_weight - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_window_yields_zero_summary() {
        let service = service_with(&[]).await;
        let summary = service
            .exercise_summary("squat", Window::Session, "2023-11-14".parse().unwrap())
            .await
            .unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.category, Category::Strength);
    }

    #[tokio::test]
    async fn comparison_reports_improvement() {
        let service = service_with(&[
            record("SQUAT", "2024-01-10", 100.0, 5, true),
            record("SQUAT", "2024-01-17", 110.0, 5, true),
        ])
        .await;

        let comparison = service
            .session_comparison("squat")
            .await
            .unwrap()
            .expect("has history");
        assert!((comparison.latest.max_weight - 110.0).abs() < f64::EPSILON);
        let previous = comparison.previous.expect("two days");
        assert!((previous.max_weight - 100.0).abs() < f64::EPSILON);
        assert!(comparison.improved);
    }

    #[tokio::test]
    async fn suggestions_match_substring_case_insensitively() {
        let service = service_with(&[
            record("BENCH PRESS", "2024-01-10", 80.0, 5, true),
            record("LEG PRESS", "2024-01-10", 150.0, 8, true),
            record("SQUAT", "2024-01-10", 100.0, 5, true),
        ])
        .await;

        let hits = service.suggestions("press").await.unwrap();
        assert_eq!(hits, vec!["BENCH PRESS", "LEG PRESS"]);

        assert!(service.suggestions("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exercise_names_only_cover_completed_sets() {
        let service = service_with(&[
            record("SQUAT", "2024-01-10", 100.0, 5, true),
            record("DEADLIFT", "2024-01-10", 140.0, 3, false),
        ])
        .await;

        assert_eq!(service.exercise_names().await.unwrap(), vec!["SQUAT"]);
    }

    #[tokio::test]
    async fn last_entry_returns_most_recent_set() {
        let repo = InMemoryRepository::new();
        let mut older = record("SQUAT", "2024-01-10", 100.0, 5, true);
        older.created_at = fixed_now();
        let mut newer = record("SQUAT", "2024-01-12", 105.0, 5, false);
        newer.created_at = fixed_now() + chrono::Duration::seconds(10);
        storage::repository::SetRepository::insert_sets(&repo, &[older, newer])
            .await
            .unwrap();
        let service = ProgressService::new(Clock::Fixed(fixed_now()), Arc::new(repo));

        let last = service.last_entry("squat").await.unwrap().expect("exists");
        assert!((last.weight() - 105.0).abs() < f64::EPSILON);
    }
}
