//! Plan types, validation, grocery derivation, generation, and meal swaps.

pub mod grocery;
pub mod refine;
pub mod swap;
pub mod types;
pub mod validate;

pub use grocery::derive_grocery;
pub use refine::{DEFAULT_MAX_TOKENS, Draft, GeneratedPlan, GenerationSettings, generate_plan};
pub use swap::{apply_meal_swap, generate_single_meal_alternative};
pub use types::{DayPlan, GROCERY_LIMIT, MealSlot, MealSlotParseError, Meals, Plan};
pub use validate::{
    IssueKind, IssueTarget, MEAL_MAX_CHARS, ValidationIssue, ValidationProfile, WORKOUT_MAX_CHARS,
    validate, validate_meal,
};
