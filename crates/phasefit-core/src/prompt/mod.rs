//! Prompt construction for plan generation, refinement, and meal swaps.
//!
//! Pure string assembly: no I/O. The same exclusion list used by the
//! validator is embedded in every prompt so the model is told exactly what
//! will be rejected.

use serde::Serialize;

use crate::model::ChatMessage;
use crate::phase::Phase;
use crate::plan::types::MealSlot;
use crate::plan::validate::ValidationIssue;
use crate::profile::{Diet, Goal, Profile};
use crate::rules;

/// System message that opens every conversation.
pub const SYSTEM_PROMPT: &str = "You are a licensed diet & fitness coach. Output STRICT JSON only.";

/// Per-goal guidance. Every goal is listed so the model sees the contrast.
const GOAL_RULES: &str = "GOAL RULES:
- energy: include iron/B12 sources, complex carbs; avoid heavy/fried.
- fat_loss: 400-600 kcal/meal, 25-35 g protein; lower added sugar.
- strength: ~30-40 g protein/meal; complex carbs around training.
- symptom_relief: anti-inflammatory (omega-3, turmeric, ginger), magnesium; easy to digest.
";

/// Extra block included only when the condition flag is set.
const CONDITION_RULES: &str = "CONDITION RULES (has_pcos=true):
- Prefer low-GI carbs (oats/quinoa/brown rice/legumes); high fiber; protein each meal.
- Avoid sugary drinks/desserts and refined grains.
";

/// Output contract for a full plan.
const PLAN_SCHEMA: &str = r#"OUTPUT JSON ONLY in this exact schema:
{
  "days": [
    {
      "label": "Day 1 • PhaseName",
      "meals": { "breakfast": "", "lunch": "", "dinner": "", "snack": "" },
      "workout": ""
    }
  ],
  "grocery": ["item1","item2","..."]
}"#;

/// Profile summary embedded in the prompts.
#[derive(Serialize)]
struct PromptProfile<'a> {
    goal: Goal,
    diet: Diet,
    dislikes: &'a [String],
    allergies: &'a [String],
    has_pcos: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle_length: Option<u32>,
    phase: String,
}

fn profile_json(profile: &Profile, phase: &Phase, with_cycle_length: bool) -> String {
    let summary = PromptProfile {
        goal: profile.goal,
        diet: profile.diet,
        dislikes: &profile.dislikes,
        allergies: &profile.allergies,
        has_pcos: profile.has_condition,
        cycle_length: with_cycle_length.then_some(profile.cycle_length),
        phase: phase.label(),
    };
    serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Build the primary generation prompt for a `days`-day plan.
pub fn build_prompt(profile: &Profile, phase: &Phase, days: u32) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str("PROFILE:\n");
    prompt.push_str(&profile_json(profile, phase, true));
    prompt.push_str("\n\n");

    prompt.push_str("ALLOWED_FOODS (use only from these, combine creatively):\n");
    prompt.push_str(&json_list(&rules::allowed_foods(profile)));
    prompt.push_str("\n\n");

    prompt.push_str("FORBIDDEN (never include any of these words/ingredients):\n");
    prompt.push_str(&json_list(&rules::exclusions(profile)));
    prompt.push_str("\n\n");

    prompt.push_str(GOAL_RULES);
    prompt.push('\n');

    if profile.has_condition {
        prompt.push_str(CONDITION_RULES);
        prompt.push('\n');
    }

    prompt.push_str("GENERAL RULES:\n");
    prompt.push_str(&format!("- Respect DIET: {}.\n", profile.diet));
    prompt.push_str("- STRICTLY exclude all FORBIDDEN tokens.\n");
    prompt.push_str("- Use SPECIFIC dishes with PORTIONS (dish name plus quantities).\n");
    prompt.push_str(
        "- No vague terms (\"protein\", \"carbs\", \"balanced bowl\", \"your choice\", \"snack box\").\n",
    );
    prompt.push_str("- Keep each meal under ~90 chars and workout under ~60 chars.\n\n");

    prompt.push_str("TASK:\n");
    prompt.push_str(&format!("Create a {days}-day plan. For each day include:\n"));
    prompt.push_str(&format!("  - label: \"Day N • {}\"\n", phase.name));
    prompt.push_str("  - meals: { breakfast, lunch, dinner, snack } (strings as above)\n");
    prompt.push_str("  - workout: short string aligned to phase\n");
    prompt.push_str(&format!("The \"days\" array must have exactly {days} entries.\n"));
    prompt.push_str("Also return a deduplicated grocery list from ALLOWED_FOODS used.\n\n");

    prompt.push_str(PLAN_SCHEMA);
    prompt
}

/// Build the corrective user turn listing every issue found in the draft.
pub fn build_refinement_request(issues: &[ValidationIssue]) -> String {
    let mut prompt = String::from("Your previous JSON had these issues that MUST be fixed:\n");
    for issue in issues {
        prompt.push_str(&format!("- {issue}\n"));
    }
    prompt.push_str("Rewrite ONLY the plan JSON, same schema, with concrete dish names + portions.\n");
    prompt.push_str("No generic wording. Output STRICT JSON only.");
    prompt
}

/// Build the single-meal replacement prompt for `slot` on `day_label`.
pub fn build_swap_prompt(
    profile: &Profile,
    phase: &Phase,
    slot: MealSlot,
    day_label: &str,
) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "We have a daily plan for {day_label}. Replace ONLY the {slot} with 1 new option.\n"
    ));
    prompt.push_str("Keep all constraints.\n\n");

    prompt.push_str("PROFILE:\n");
    prompt.push_str(&profile_json(profile, phase, false));
    prompt.push_str("\n\n");

    prompt.push_str("ALLOWED_FOODS: ");
    prompt.push_str(&json_list(&rules::allowed_foods(profile)));
    prompt.push('\n');
    prompt.push_str("FORBIDDEN: ");
    prompt.push_str(&json_list(&rules::exclusions(profile)));
    prompt.push_str("\n\n");

    prompt.push_str("RULES:\n");
    prompt.push_str("- Specific dish with portions, <=90 chars.\n");
    prompt.push_str("- No vague terms (protein/carb/balanced/etc.).\n");
    prompt.push_str("- Respect diet and avoid all forbidden tokens.\n\n");

    prompt.push_str("Return STRICT JSON:\n");
    prompt.push_str(r#"{"new_meal": "string"}"#);
    prompt
}

/// System message followed by `user_prompt`.
pub fn conversation(user_prompt: String) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt)]
}
