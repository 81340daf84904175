//! Grouping of a day's sets for the plan view.

use serde::Serialize;

use crate::model::{CATEGORY_DISPLAY_ORDER, Category, SetEntry};

/// One exercise within a category group, with its sets in logged order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseGroup {
    pub exercise: String,
    pub sets: Vec<SetEntry>,
}

impl ExerciseGroup {
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.sets.iter().filter(|s| s.is_completed()).count()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.sets.len()
    }
}

/// A category with its exercises, in the fixed display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub exercises: Vec<ExerciseGroup>,
}

/// Group a day's sets by category, then by exercise name.
///
/// Categories appear in the fixed display order (stretching, strength, core,
/// cardio); within a category, exercises and their sets keep the incoming
/// order, which callers provide sorted by sort order and creation time.
/// Categories without sets are omitted.
#[must_use]
pub fn group_day(sets: &[SetEntry]) -> Vec<CategoryGroup> {
    CATEGORY_DISPLAY_ORDER
        .iter()
        .filter_map(|&category| {
            let exercises = group_exercises(sets, category);
            if exercises.is_empty() {
                None
            } else {
                Some(CategoryGroup {
                    category,
                    exercises,
                })
            }
        })
        .collect()
}

fn group_exercises(sets: &[SetEntry], category: Category) -> Vec<ExerciseGroup> {
    let mut groups: Vec<ExerciseGroup> = Vec::new();
    for set in sets.iter().filter(|s| s.category() == category) {
        match groups.iter_mut().find(|g| g.exercise == set.exercise()) {
            Some(group) => group.sets.push(set.clone()),
            None => groups.push(ExerciseGroup {
                exercise: set.exercise().to_string(),
                sets: vec![set.clone()],
            }),
        }
    }
    groups
}

/// Distinct exercise names of a day in encounter order.
///
/// This is the ordering the reorder operation works against.
#[must_use]
pub fn exercise_order(sets: &[SetEntry]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for set in sets {
        if !names.iter().any(|n| n == set.exercise()) {
            names.push(set.exercise().to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SetId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build_set(id: u64, exercise: &str, category: Category, sort_order: u32) -> SetEntry {
        SetEntry::from_persisted(
            SetId::new(id),
            exercise,
            category,
            0.0,
            10,
            "2024-01-10".parse().unwrap(),
            id % 2 == 0,
            sort_order,
            fixed_now() + Duration::seconds(i64::try_from(id).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn groups_follow_display_order() {
        let sets = vec![
            build_set(1, "ROW", Category::Cardio, 0),
            build_set(2, "HAMSTRING STRETCH", Category::Stretching, 1),
            build_set(3, "PLANK", Category::Core, 2),
        ];

        let groups = group_day(&sets);
        let categories: Vec<Category> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec![Category::Stretching, Category::Core, Category::Cardio]
        );
    }

    #[test]
    fn sets_stay_grouped_per_exercise_in_order() {
        let sets = vec![
            build_set(1, "SQUAT", Category::Strength, 0),
            build_set(2, "BENCH PRESS", Category::Strength, 1),
            build_set(3, "SQUAT", Category::Strength, 0),
        ];

        let groups = group_day(&sets);
        assert_eq!(groups.len(), 1);
        let exercises = &groups[0].exercises;
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].exercise, "SQUAT");
        assert_eq!(exercises[0].sets.len(), 2);
        assert_eq!(exercises[1].exercise, "BENCH PRESS");
    }

    #[test]
    fn empty_categories_are_omitted() {
        let sets = vec![build_set(1, "SQUAT", Category::Strength, 0)];
        let groups = group_day(&sets);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, Category::Strength);
    }

    #[test]
    fn completed_counts_per_exercise() {
        let sets = vec![
            build_set(1, "SQUAT", Category::Strength, 0),
            build_set(2, "SQUAT", Category::Strength, 0),
        ];
        let groups = group_day(&sets);
        let squat = &groups[0].exercises[0];
        assert_eq!(squat.total_count(), 2);
        assert_eq!(squat.completed_count(), 1);
    }

    #[test]
    fn exercise_order_preserves_first_appearance() {
        let sets = vec![
            build_set(1, "SQUAT", Category::Strength, 0),
            build_set(2, "BENCH PRESS", Category::Strength, 1),
            build_set(3, "SQUAT", Category::Strength, 0),
        ];
        assert_eq!(exercise_order(&sets), vec!["SQUAT", "BENCH PRESS"]);
    }
}
