//! Wire types for a generated plan.
//!
//! These map directly to the JSON schema the model is asked to produce and
//! are deserialized via `serde` + `serde_json`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in a grocery list.
pub const GROCERY_LIMIT: usize = 80;

/// Top-level plan returned by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// One entry per generated day, in order.
    pub days: Vec<DayPlan>,
    /// Distinct display-cased shopping items.
    #[serde(default)]
    pub grocery: Vec<String>,
}

/// A single day of the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayPlan {
    /// Display label, e.g. `Day 1 • Follicular`.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub meals: Meals,
    /// Short workout suggestion aligned to the phase.
    #[serde(default)]
    pub workout: String,
}

/// The four fixed meal slots of a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
    #[serde(default)]
    pub snack: String,
}

impl Meals {
    /// The meal text for `slot`.
    pub fn get(&self, slot: MealSlot) -> &str {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snack => &self.snack,
        }
    }

    /// Mutable access to the meal text for `slot`.
    pub fn get_mut(&mut self, slot: MealSlot) -> &mut String {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snack => &mut self.snack,
        }
    }

    /// `(slot, text)` pairs in fixed slot order.
    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, &str)> {
        MealSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

// ---------------------------------------------------------------------------

/// Name of a meal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// All slots in plan order.
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        };
        f.write_str(s)
    }
}

impl FromStr for MealSlot {
    type Err = MealSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            other => Err(MealSlotParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MealSlot`] string.
#[derive(Debug, Clone)]
pub struct MealSlotParseError(pub String);

impl fmt::Display for MealSlotParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid meal slot: {:?} (expected breakfast, lunch, dinner, or snack)",
            self.0
        )
    }
}

impl std::error::Error for MealSlotParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_plan() {
        let json = r#"{"days":[{"label":"Day 1","meals":{"breakfast":"Oats"},"workout":"Walk 20 min"}]}"#;
        let plan: Plan = serde_json::from_str(json).expect("should parse");
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].meals.breakfast, "Oats");
        assert_eq!(plan.days[0].meals.lunch, "");
        assert!(plan.grocery.is_empty());
    }

    #[test]
    fn plan_without_days_is_rejected() {
        let result: Result<Plan, _> = serde_json::from_str(r#"{"grocery":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn meals_iterate_in_slot_order() {
        let meals = Meals {
            breakfast: "a".into(),
            lunch: "b".into(),
            dinner: "c".into(),
            snack: "d".into(),
        };
        let order: Vec<(MealSlot, &str)> = meals.iter().collect();
        assert_eq!(
            order,
            vec![
                (MealSlot::Breakfast, "a"),
                (MealSlot::Lunch, "b"),
                (MealSlot::Dinner, "c"),
                (MealSlot::Snack, "d"),
            ]
        );
    }

    #[test]
    fn slot_parse_and_display() {
        assert_eq!("dinner".parse::<MealSlot>().unwrap(), MealSlot::Dinner);
        assert_eq!(MealSlot::Snack.to_string(), "snack");
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn get_mut_replaces_slot() {
        let mut meals = Meals::default();
        *meals.get_mut(MealSlot::Lunch) = "Lentil soup (1 cup)".into();
        assert_eq!(meals.get(MealSlot::Lunch), "Lentil soup (1 cup)");
    }
}
