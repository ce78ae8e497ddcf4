//! Cycle-aware meal and workout plan generation.
//!
//! The pipeline turns a [`Profile`] and a cycle [`Phase`] into a prompt,
//! sends it to a [`ChatModel`], validates the returned [`Plan`], makes at
//! most one corrective call, and fills in a grocery list. Everything except
//! the model call is pure.

pub mod error;
pub mod model;
pub mod phase;
pub mod plan;
pub mod profile;
pub mod prompt;
pub mod rules;

pub use error::{ErrorCategory, ParseStage, PlanError};
pub use model::{ChatMessage, ChatModel, HttpChatModel, ModelConfig, ProviderRegistry};
pub use phase::{Phase, PhaseName, compute_phase, compute_phase_on};
pub use plan::{
    GeneratedPlan, GenerationSettings, MealSlot, Plan, apply_meal_swap, derive_grocery,
    generate_plan, generate_single_meal_alternative,
};
pub use profile::{Diet, Goal, Profile};
