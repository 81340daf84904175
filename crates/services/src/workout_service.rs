use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use storage::repository::{NewSetRecord, SetRepository};
use track_core::grouping::{self, CategoryGroup};
use track_core::model::{Category, SetEntry, SetError, SetId};

use crate::Clock;
use crate::error::WorkoutServiceError;

/// Input for logging one or more identical sets of an exercise.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSetInput {
    pub exercise: String,
    pub category: Category,
    pub weight: f64,
    pub reps: u32,
    pub date: NaiveDate,
    #[serde(default = "default_set_count")]
    pub count: u32,
}

fn default_set_count() -> u32 {
    1
}

// The input form submits single-digit counts; anything larger is a bad
// client and gets clamped rather than turned into a bulk insert.
const MAX_SETS_PER_LOG: u32 = 20;

/// Grouped view of one day's workout.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub groups: Vec<CategoryGroup>,
    pub completed_sets: usize,
    pub total_sets: usize,
}

/// Direction for reordering an exercise within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Orchestrates set logging and day editing over the set repository.
#[derive(Clone)]
pub struct WorkoutService {
    clock: Clock,
    sets: Arc<dyn SetRepository>,
}

impl WorkoutService {
    #[must_use]
    pub fn new(clock: Clock, sets: Arc<dyn SetRepository>) -> Self {
        Self { clock, sets }
    }

    /// Log `count` identical sets of an exercise on a date.
    ///
    /// The exercise name is normalized, the weight invariant is applied, and
    /// every inserted row starts out not completed. A new exercise is placed
    /// after the day's existing exercises; sets of an exercise already on the
    /// day keep its position. `count` is clamped to `MAX_SETS_PER_LOG`.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Set` for validation failures and
    /// `WorkoutServiceError::Storage` if persistence fails.
    pub async fn log_sets(&self, input: NewSetInput) -> Result<Vec<SetId>, WorkoutServiceError> {
        let now = self.clock.now();
        // Run the full domain validation once; the prototype carries the
        // normalized name and the invariant-adjusted weight.
        let proto = SetEntry::new(
            SetId::new(0),
            input.exercise,
            input.category,
            input.weight,
            input.reps,
            input.date,
            0,
            now,
        )?;

        let day = self.sets.list_for_day(input.date).await?;
        let sort_order = match day.iter().find(|s| s.exercise() == proto.exercise()) {
            Some(existing) => existing.sort_order(),
            None => distinct_exercise_count(&day),
        };

        let count = usize::try_from(input.count.clamp(1, MAX_SETS_PER_LOG)).unwrap_or(1);
        let records: Vec<NewSetRecord> = (0..count)
            .map(|_| NewSetRecord {
                exercise: proto.exercise().to_owned(),
                category: proto.category(),
                weight: proto.weight(),
                reps: proto.reps(),
                date: proto.date(),
                completed: false,
                sort_order,
                created_at: now,
            })
            .collect();

        let ids = self.sets.insert_sets(&records).await?;
        debug!(exercise = proto.exercise(), count, "logged sets");
        Ok(ids)
    }

    /// Log one more set identical to the exercise's latest set of the day.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::NoHistory` if the exercise has no set on
    /// that day.
    pub async fn repeat_last_set(
        &self,
        date: NaiveDate,
        exercise: &str,
    ) -> Result<SetId, WorkoutServiceError> {
        let name = track_core::model::normalize_exercise_name(exercise.to_owned())?;
        let day = self.sets.list_for_day(date).await?;
        let last = day
            .iter()
            .filter(|s| s.exercise() == name)
            .max_by_key(|s| (s.created_at(), s.id().value()))
            .ok_or(WorkoutServiceError::NoHistory)?;

        let record = NewSetRecord::clone_of(last, date, self.clock.now());
        let ids = self.sets.insert_sets(&[record]).await?;
        ids.into_iter()
            .next()
            .ok_or(WorkoutServiceError::Storage(
                storage::repository::StorageError::NotFound,
            ))
    }

    /// Grouped view of one day with completion counts.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if repository access fails.
    pub async fn day_plan(&self, date: NaiveDate) -> Result<DayPlan, WorkoutServiceError> {
        let sets = self.sets.list_for_day(date).await?;
        let completed_sets = sets.iter().filter(|s| s.is_completed()).count();
        let total_sets = sets.len();
        Ok(DayPlan {
            date,
            groups: grouping::group_day(&sets),
            completed_sets,
            total_sets,
        })
    }

    /// Mark a set completed or not.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if the set does not exist.
    pub async fn set_completed(
        &self,
        id: SetId,
        completed: bool,
    ) -> Result<(), WorkoutServiceError> {
        self.sets.set_completed(id, completed).await?;
        Ok(())
    }

    /// Correct the recorded weight/reps of a set.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Set` for invalid weights and
    /// `WorkoutServiceError::Storage` if the set does not exist.
    pub async fn update_metrics(
        &self,
        id: SetId,
        weight: f64,
        reps: u32,
    ) -> Result<(), WorkoutServiceError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SetError::InvalidWeight.into());
        }
        self.sets.update_metrics(id, weight, reps).await?;
        Ok(())
    }

    /// Delete one set.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if the set does not exist.
    pub async fn delete_set(&self, id: SetId) -> Result<(), WorkoutServiceError> {
        self.sets.delete_set(id).await?;
        Ok(())
    }

    /// Delete every set of one day, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if repository access fails.
    pub async fn clear_day(&self, date: NaiveDate) -> Result<u64, WorkoutServiceError> {
        let removed = self.sets.delete_for_day(date).await?;
        debug!(%date, removed, "cleared day");
        Ok(removed)
    }

    /// Copy every set of the source day onto the target day with completion
    /// reset, returning the number of sets inserted.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if repository access fails.
    pub async fn clone_day(
        &self,
        source: NaiveDate,
        target: NaiveDate,
    ) -> Result<usize, WorkoutServiceError> {
        let now = self.clock.now();
        let sets = self.sets.list_for_day(source).await?;
        let records: Vec<NewSetRecord> = sets
            .iter()
            .map(|s| NewSetRecord::clone_of(s, target, now))
            .collect();
        if records.is_empty() {
            return Ok(0);
        }
        let ids = self.sets.insert_sets(&records).await?;
        debug!(%source, %target, count = ids.len(), "cloned day");
        Ok(ids.len())
    }

    /// Move an exercise one position up or down within its day by swapping
    /// sort orders with the adjacent exercise. A move past either edge is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if the batch update fails.
    pub async fn move_exercise(
        &self,
        date: NaiveDate,
        exercise: &str,
        direction: MoveDirection,
    ) -> Result<(), WorkoutServiceError> {
        let name = track_core::model::normalize_exercise_name(exercise.to_owned())?;
        let day = self.sets.list_for_day(date).await?;
        let order = grouping::exercise_order(&day);

        let Some(index) = order.iter().position(|n| *n == name) else {
            return Ok(());
        };
        let neighbor_index = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => (index + 1 < order.len()).then_some(index + 1),
        };
        let Some(neighbor_index) = neighbor_index else {
            return Ok(());
        };
        let neighbor = &order[neighbor_index];

        let order_of = |target: &str| {
            day.iter()
                .find(|s| s.exercise() == target)
                .map(SetEntry::sort_order)
        };
        let (Some(own_order), Some(neighbor_order)) = (order_of(&name), order_of(neighbor)) else {
            return Ok(());
        };

        let mut changes: Vec<(SetId, u32)> = Vec::new();
        for set in &day {
            if set.exercise() == name {
                changes.push((set.id(), neighbor_order));
            } else if set.exercise() == *neighbor {
                changes.push((set.id(), own_order));
            }
        }
        self.sets.update_sort_orders(&changes).await?;
        Ok(())
    }

    /// Distinct dates with at least one logged set, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if repository access fails.
    pub async fn workout_dates(&self) -> Result<Vec<NaiveDate>, WorkoutServiceError> {
        let dates = self.sets.workout_dates().await?;
        Ok(dates)
    }
}

fn distinct_exercise_count(day: &[SetEntry]) -> u32 {
    let names = grouping::exercise_order(day);
    u32::try_from(names.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;
    use track_core::time::fixed_now;

    fn service() -> WorkoutService {
        WorkoutService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    fn input(exercise: &str, category: Category, weight: f64, count: u32) -> NewSetInput {
        NewSetInput {
            exercise: exercise.to_owned(),
            category,
            weight,
            reps: 5,
            date: "2024-01-10".parse().unwrap(),
            count,
        }
    }

    #[tokio::test]
    async fn log_sets_normalizes_name_and_inserts_count_rows() {
        let service = service();
        let ids = service
            .log_sets(input("  bench press ", Category::Strength, 100.0, 3))
            .await
            .unwrap();
        assert_eq!(ids.len(), 3);

        let plan = service.day_plan("2024-01-10".parse().unwrap()).await.unwrap();
        assert_eq!(plan.total_sets, 3);
        assert_eq!(plan.completed_sets, 0);
        assert_eq!(plan.groups[0].exercises[0].exercise, "BENCH PRESS");
    }

    #[tokio::test]
    async fn log_sets_clamps_oversized_counts() {
        let service = service();
        let ids = service
            .log_sets(input("squat", Category::Strength, 100.0, u32::MAX))
            .await
            .unwrap();
        assert_eq!(ids.len(), MAX_SETS_PER_LOG as usize);

        let ids = service
            .log_sets(input("row", Category::Strength, 60.0, 0))
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn log_sets_zeroes_weight_for_timed_categories() {
        let service = service();
        service
            .log_sets(input("plank", Category::Core, 25.0, 1))
            .await
            .unwrap();

        let plan = service.day_plan("2024-01-10".parse().unwrap()).await.unwrap();
        let set = &plan.groups[0].exercises[0].sets[0];
        assert!((set.weight() - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn new_exercise_lands_after_existing_ones() {
        let service = service();
        service
            .log_sets(input("squat", Category::Strength, 100.0, 2))
            .await
            .unwrap();
        service
            .log_sets(input("row", Category::Strength, 60.0, 1))
            .await
            .unwrap();
        // More squat sets keep the squat position.
        service
            .log_sets(input("squat", Category::Strength, 100.0, 1))
            .await
            .unwrap();

        let plan = service.day_plan("2024-01-10".parse().unwrap()).await.unwrap();
        let names: Vec<&str> = plan.groups[0]
            .exercises
            .iter()
            .map(|e| e.exercise.as_str())
            .collect();
        assert_eq!(names, vec!["SQUAT", "ROW"]);
        assert_eq!(plan.groups[0].exercises[0].sets.len(), 3);
    }

    #[tokio::test]
    async fn repeat_last_set_clones_latest_metrics() {
        let service = service();
        service
            .log_sets(input("squat", Category::Strength, 100.0, 1))
            .await
            .unwrap();

        let id = service
            .repeat_last_set("2024-01-10".parse().unwrap(), "squat")
            .await
            .unwrap();
        assert!(id.value() > 0);

        let plan = service.day_plan("2024-01-10".parse().unwrap()).await.unwrap();
        assert_eq!(plan.total_sets, 2);
    }

    #[tokio::test]
    async fn repeat_last_set_requires_history() {
        let service = service();
        let err = service
            .repeat_last_set("2024-01-10".parse().unwrap(), "deadlift")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkoutServiceError::NoHistory));
    }

    #[tokio::test]
    async fn clear_day_removes_only_that_date() {
        let service = service();
        service
            .log_sets(input("squat", Category::Strength, 100.0, 2))
            .await
            .unwrap();
        let mut other = input("squat", Category::Strength, 100.0, 1);
        other.date = "2024-01-11".parse().unwrap();
        service.log_sets(other).await.unwrap();

        let removed = service.clear_day("2024-01-10".parse().unwrap()).await.unwrap();
        assert_eq!(removed, 2);

        let remaining = service.day_plan("2024-01-11".parse().unwrap()).await.unwrap();
        assert_eq!(remaining.total_sets, 1);
    }

    #[tokio::test]
    async fn clone_day_resets_completion() {
        let service = service();
        let ids = service
            .log_sets(input("squat", Category::Strength, 100.0, 2))
            .await
            .unwrap();
        service.set_completed(ids[0], true).await.unwrap();

        let count = service
            .clone_day(
                "2024-01-10".parse().unwrap(),
                "2024-01-12".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(count, 2);

        let plan = service.day_plan("2024-01-12".parse().unwrap()).await.unwrap();
        assert_eq!(plan.total_sets, 2);
        assert_eq!(plan.completed_sets, 0);
    }

    #[tokio::test]
    async fn clone_of_empty_day_is_zero() {
        let service = service();
        let count = service
            .clone_day(
                "2024-01-10".parse().unwrap(),
                "2024-01-12".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn move_exercise_swaps_with_neighbor() {
        let service = service();
        let date: NaiveDate = "2024-01-10".parse().unwrap();
        service
            .log_sets(input("squat", Category::Strength, 100.0, 1))
            .await
            .unwrap();
        service
            .log_sets(input("row", Category::Strength, 60.0, 1))
            .await
            .unwrap();

        service
            .move_exercise(date, "row", MoveDirection::Up)
            .await
            .unwrap();

        let plan = service.day_plan(date).await.unwrap();
        let names: Vec<&str> = plan.groups[0]
            .exercises
            .iter()
            .map(|e| e.exercise.as_str())
            .collect();
        assert_eq!(names, vec!["ROW", "SQUAT"]);
    }

    #[tokio::test]
    async fn move_at_the_edge_is_a_noop() {
        let service = service();
        let date: NaiveDate = "2024-01-10".parse().unwrap();
        service
            .log_sets(input("squat", Category::Strength, 100.0, 1))
            .await
            .unwrap();

        service
            .move_exercise(date, "squat", MoveDirection::Up)
            .await
            .unwrap();
        service
            .move_exercise(date, "squat", MoveDirection::Down)
            .await
            .unwrap();

        let plan = service.day_plan(date).await.unwrap();
        assert_eq!(plan.groups[0].exercises[0].exercise, "SQUAT");
    }

    #[tokio::test]
    async fn update_metrics_rejects_negative_weight() {
        let service = service();
        let ids = service
            .log_sets(input("squat", Category::Strength, 100.0, 1))
            .await
            .unwrap();

        let err = service.update_metrics(ids[0], -5.0, 5).await.unwrap_err();
        assert!(matches!(err, WorkoutServiceError::Set(_)));
    }

    #[tokio::test]
    async fn workout_dates_are_descending() {
        let service = service();
        service
            .log_sets(input("squat", Category::Strength, 100.0, 1))
            .await
            .unwrap();
        let mut later = input("squat", Category::Strength, 100.0, 1);
        later.date = "2024-01-15".parse().unwrap();
        service.log_sets(later).await.unwrap();

        let dates = service.workout_dates().await.unwrap();
        assert_eq!(
            dates,
            vec![
                "2024-01-15".parse::<NaiveDate>().unwrap(),
                "2024-01-10".parse::<NaiveDate>().unwrap()
            ]
        );
    }
}
