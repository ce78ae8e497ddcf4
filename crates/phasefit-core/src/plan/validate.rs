//! Plan validation: pure checks over generated text.
//!
//! Two named profiles share the same token-matching primitives:
//! [`ValidationProfile::FullPlan`] runs every check on every slot of every
//! day, while [`ValidationProfile::SingleMeal`] only looks for forbidden
//! tokens and generic wording in one replacement meal.

use std::fmt;

use crate::plan::types::{MealSlot, Plan};
use crate::profile::{Goal, Profile};
use crate::rules;

/// Meals longer than this (in characters) are reported as too long.
pub const MEAL_MAX_CHARS: usize = 120;

/// Workouts longer than this (in characters) are reported as too long.
pub const WORKOUT_MAX_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Issue types
// ---------------------------------------------------------------------------

/// Which text in a day the issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTarget {
    Meal(MealSlot),
    Workout,
}

impl fmt::Display for IssueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meal(slot) => write!(f, "{slot}"),
            Self::Workout => f.write_str("workout"),
        }
    }
}

/// What is wrong with the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Contains an excluded token (the first match, in exclusion order).
    Forbidden(String),
    /// Uses vague wording; carries the offending text.
    Generic(String),
    TooLong,
    /// No protein indicator for a protein-focused goal. Heuristic.
    LowProtein,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// 1-based day index. `None` for a standalone meal.
    pub day: Option<usize>,
    pub target: IssueTarget,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(day) = self.day {
            write!(f, "Day {day} ")?;
        }
        write!(f, "{}: ", self.target)?;
        match &self.kind {
            IssueKind::Forbidden(token) => write!(f, "contains \"{token}\""),
            IssueKind::Generic(text) => write!(f, "too generic ({text})"),
            IssueKind::TooLong => f.write_str("too long"),
            IssueKind::LowProtein => f.write_str("may be low protein for goal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Which set of checks to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationProfile {
    /// Forbidden tokens, generic wording, length, and the protein heuristic.
    FullPlan,
    /// Forbidden tokens and generic wording only.
    SingleMeal,
}

impl ValidationProfile {
    fn meal_issues(self, text: &str, exclusions: &[String], goal: Goal) -> Vec<IssueKind> {
        let mut kinds = Vec::new();
        if let Some(token) = rules::find_forbidden(text, exclusions) {
            kinds.push(IssueKind::Forbidden(token.to_string()));
        }
        if rules::has_generic(text) {
            kinds.push(IssueKind::Generic(text.to_string()));
        }
        if self == Self::FullPlan {
            if text.chars().count() > MEAL_MAX_CHARS {
                kinds.push(IssueKind::TooLong);
            }
            if goal.wants_protein_every_meal() && !rules::mentions_protein(text) {
                kinds.push(IssueKind::LowProtein);
            }
        }
        kinds
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate every day of `plan` against `profile`.
///
/// Issues are ordered by day, then slot (breakfast, lunch, dinner, snack,
/// workout), then check. An empty result means the plan is acceptable.
pub fn validate(plan: &Plan, profile: &Profile) -> Vec<ValidationIssue> {
    let exclusions = rules::exclusions(profile);
    let mut issues = Vec::new();

    for (index, day) in plan.days.iter().enumerate() {
        let day_no = Some(index + 1);

        for (slot, text) in day.meals.iter() {
            let kinds = ValidationProfile::FullPlan.meal_issues(text, &exclusions, profile.goal);
            issues.extend(kinds.into_iter().map(|kind| ValidationIssue {
                day: day_no,
                target: IssueTarget::Meal(slot),
                kind,
            }));
        }

        let workout = day.workout.as_str();
        if rules::has_generic(workout) {
            issues.push(ValidationIssue {
                day: day_no,
                target: IssueTarget::Workout,
                kind: IssueKind::Generic(workout.to_string()),
            });
        }
        if workout.chars().count() > WORKOUT_MAX_CHARS {
            issues.push(ValidationIssue {
                day: day_no,
                target: IssueTarget::Workout,
                kind: IssueKind::TooLong,
            });
        }
    }

    issues
}

/// Validate one replacement meal for `slot` with the single-meal profile.
pub fn validate_meal(text: &str, slot: MealSlot, profile: &Profile) -> Vec<ValidationIssue> {
    let exclusions = rules::exclusions(profile);
    ValidationProfile::SingleMeal
        .meal_issues(text, &exclusions, profile.goal)
        .into_iter()
        .map(|kind| ValidationIssue {
            day: None,
            target: IssueTarget::Meal(slot),
            kind,
        })
        .collect()
}
