use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    raw: String,
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.raw)
    }
}

/// Exercise classification.
///
/// The category decides which numeric fields of a set are meaningful: weight
/// only applies to `Strength`, and the reps field holds repetitions for
/// `Strength`, minutes for `Cardio`, and seconds for `Stretching`/`Core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Stretching,
    Strength,
    Core,
    Cardio,
}

/// Fixed order in which categories are grouped for a day's plan.
pub const CATEGORY_DISPLAY_ORDER: [Category; 4] = [
    Category::Stretching,
    Category::Strength,
    Category::Core,
    Category::Cardio,
];

impl Category {
    /// Persisted string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stretching => "STRETCHING",
            Category::Strength => "STRENGTH",
            Category::Core => "CORE",
            Category::Cardio => "CARDIO",
        }
    }

    /// Returns true when the weight field carries meaning for this category.
    #[must_use]
    pub fn uses_weight(&self) -> bool {
        matches!(self, Category::Strength)
    }

    /// Unit label for the reps/duration field.
    #[must_use]
    pub fn reps_unit(&self) -> &'static str {
        match self {
            Category::Strength => "REPS",
            Category::Cardio => "MIN",
            Category::Stretching | Category::Core => "SEC",
        }
    }

    /// Unit label for the metric shown in progress views: weight for
    /// strength work, duration otherwise.
    #[must_use]
    pub fn metric_unit(&self) -> &'static str {
        match self {
            Category::Strength => "LB",
            Category::Cardio => "MIN",
            Category::Stretching | Category::Core => "SEC",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STRETCHING" => Ok(Category::Stretching),
            "STRENGTH" => Ok(Category::Strength),
            "CORE" => Ok(Category::Core),
            "CARDIO" => Ok(Category::Cardio),
            other => Err(ParseCategoryError {
                raw: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_string_roundtrip() {
        for cat in CATEGORY_DISPLAY_ORDER {
            let parsed: Category = cat.as_str().parse().unwrap();
            assert_eq!(parsed, cat);
        }
    }

    #[test]
    fn category_rejects_unknown() {
        let err = "YOGA".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category: YOGA");
    }

    #[test]
    fn only_strength_uses_weight() {
        assert!(Category::Strength.uses_weight());
        assert!(!Category::Stretching.uses_weight());
        assert!(!Category::Core.uses_weight());
        assert!(!Category::Cardio.uses_weight());
    }

    #[test]
    fn reps_units_depend_on_category() {
        assert_eq!(Category::Strength.reps_unit(), "REPS");
        assert_eq!(Category::Cardio.reps_unit(), "MIN");
        assert_eq!(Category::Core.reps_unit(), "SEC");
        assert_eq!(Category::Stretching.reps_unit(), "SEC");
    }
}
