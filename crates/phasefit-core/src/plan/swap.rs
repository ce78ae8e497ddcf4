//! Single-meal replacement.
//!
//! One model call, validated with the single-meal profile, with no retry.
//! A rejected alternative is an error rather than a best-effort result.

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ParseStage, PlanError};
use crate::model::{self, ChatModel};
use crate::phase::Phase;
use crate::plan::grocery::derive_grocery;
use crate::plan::refine::GenerationSettings;
use crate::plan::types::{MealSlot, Plan};
use crate::plan::validate::validate_meal;
use crate::profile::Profile;
use crate::prompt;

#[derive(Debug, Deserialize)]
struct SwapReply {
    #[serde(default)]
    new_meal: Option<String>,
}

/// Ask the model for one replacement for `slot` on the day labelled
/// `day_label`.
///
/// Fails with [`PlanError::Parse`] if the reply has no usable `new_meal`,
/// and with [`PlanError::Validation`] if the meal contains a forbidden token
/// or generic wording.
///
/// Callers must not run two swaps for the same slot concurrently.
pub async fn generate_single_meal_alternative(
    model: &dyn ChatModel,
    settings: &GenerationSettings,
    profile: &Profile,
    phase: &Phase,
    slot: MealSlot,
    day_label: &str,
) -> Result<String, PlanError> {
    let messages = prompt::conversation(prompt::build_swap_prompt(profile, phase, slot, day_label));
    let reply: SwapReply = model::call_json(model, &messages, settings.max_tokens).await?;

    let meal = reply
        .new_meal
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| PlanError::parse(ParseStage::Schema, "no new_meal returned"))?;

    let issues = validate_meal(&meal, slot, profile);
    if !issues.is_empty() {
        warn!(%slot, issues = issues.len(), "alternative meal rejected");
        return Err(PlanError::Validation { issues });
    }

    info!(%slot, day = day_label, "alternative meal accepted");
    Ok(meal)
}

/// Return a copy of `plan` with `slot` on day `day_index` (0-based) set to
/// `new_meal` and the grocery list re-derived.
///
/// Returns `None` if `day_index` is out of range. `plan` is not modified.
pub fn apply_meal_swap(
    plan: &Plan,
    day_index: usize,
    slot: MealSlot,
    new_meal: &str,
) -> Option<Plan> {
    let mut updated = plan.clone();
    let day = updated.days.get_mut(day_index)?;
    *day.meals.get_mut(slot) = new_meal.to_string();
    updated.grocery = derive_grocery(&updated);
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::types::{DayPlan, Meals};

    fn two_day_plan() -> Plan {
        let day = |label: &str| DayPlan {
            label: label.to_string(),
            meals: Meals {
                breakfast: "Oats, berries".to_string(),
                lunch: "Chickpea salad".to_string(),
                dinner: "Lentil dal".to_string(),
                snack: "Apple".to_string(),
            },
            workout: "Walk (30 min)".to_string(),
        };
        Plan {
            days: vec![day("Day 1 • Luteal"), day("Day 2 • Luteal")],
            grocery: vec!["Stale".to_string()],
        }
    }

    #[test]
    fn swap_replaces_one_slot_and_rederives_grocery() {
        let plan = two_day_plan();
        let updated = apply_meal_swap(&plan, 1, MealSlot::Snack, "Pear, almonds").unwrap();

        assert_eq!(updated.days[1].meals.snack, "Pear, almonds");
        assert_eq!(updated.days[0].meals.snack, "Apple");
        assert!(updated.grocery.contains(&"Almonds".to_string()));
        assert!(!updated.grocery.contains(&"Stale".to_string()));

        // input untouched
        assert_eq!(plan.days[1].meals.snack, "Apple");
        assert_eq!(plan.grocery, vec!["Stale".to_string()]);
    }

    #[test]
    fn swap_out_of_range_is_none() {
        assert!(apply_meal_swap(&two_day_plan(), 2, MealSlot::Lunch, "x").is_none());
    }
}
