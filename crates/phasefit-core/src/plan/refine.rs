//! Plan generation with a single validation-driven refinement pass.
//!
//! ```text
//! primary prompt --> model --> Draft --validate--> clean? --yes--> accept
//!                                                    |
//!                                                    no
//!                                                    v
//!                        primary + assistant(draft) + user(issues) --> model --> refined
//! ```
//!
//! A [`Draft`] is consumed by either [`Draft::accept`] or [`Draft::refine`];
//! both produce a [`GeneratedPlan`], which cannot be refined again.

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::{ParseStage, PlanError};
use crate::model::{self, ChatMessage, ChatModel};
use crate::phase::Phase;
use crate::plan::grocery::derive_grocery;
use crate::plan::types::Plan;
use crate::plan::validate::{ValidationIssue, validate};
use crate::profile::Profile;
use crate::prompt;

/// Default completion budget per model call.
pub const DEFAULT_MAX_TOKENS: u32 = 900;

/// Per-request generation settings, passed explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Final output of [`generate_plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    pub plan: Plan,
    /// True if the corrective call was made.
    pub refined: bool,
    /// Issues found in the first draft.
    pub initial_issues: Vec<ValidationIssue>,
    /// Issues still present in the returned plan. Informational; the plan
    /// is returned either way.
    pub remaining_issues: Vec<ValidationIssue>,
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// A first-pass plan together with its validation result.
#[derive(Debug, Clone)]
pub struct Draft {
    plan: Plan,
    issues: Vec<ValidationIssue>,
}

impl Draft {
    /// Validate `plan` against `profile`.
    pub fn new(plan: Plan, profile: &Profile) -> Self {
        let issues = validate(&plan, profile);
        Self { plan, issues }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Take the draft as-is.
    pub fn accept(self) -> GeneratedPlan {
        GeneratedPlan {
            plan: fill_grocery(self.plan),
            refined: false,
            initial_issues: self.issues,
            remaining_issues: Vec::new(),
        }
    }

    /// Make exactly one corrective call and return its plan.
    ///
    /// `primary` is the original conversation. The draft is serialized back
    /// as the assistant turn and followed by the list of issues. The refined
    /// plan is re-validated for reporting only; there is no second pass.
    pub async fn refine(
        self,
        model: &dyn ChatModel,
        settings: &GenerationSettings,
        profile: &Profile,
        primary: &[ChatMessage],
    ) -> Result<GeneratedPlan, PlanError> {
        let draft_json = serde_json::to_string(&self.plan)
            .map_err(|e| PlanError::parse(ParseStage::Schema, e))?;

        let mut messages = primary.to_vec();
        messages.push(ChatMessage::assistant(draft_json));
        messages.push(ChatMessage::user(prompt::build_refinement_request(
            &self.issues,
        )));

        let plan: Plan = model::call_json(model, &messages, settings.max_tokens).await?;
        let remaining_issues = validate(&plan, profile);
        if remaining_issues.is_empty() {
            info!("refined plan passed validation");
        } else {
            warn!(
                remaining = remaining_issues.len(),
                "refined plan still has issues; returning it anyway"
            );
        }

        Ok(GeneratedPlan {
            plan: fill_grocery(plan),
            refined: true,
            initial_issues: self.issues,
            remaining_issues,
        })
    }
}

fn fill_grocery(mut plan: Plan) -> Plan {
    if plan.grocery.is_empty() {
        plan.grocery = derive_grocery(&plan);
        debug!(items = plan.grocery.len(), "derived grocery list from meals");
    }
    plan
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Generate a `days`-day plan for `profile` in `phase`.
///
/// Makes one model call, validates the result, and makes one corrective
/// call if any issue was found. Any model failure aborts the whole
/// operation; no partial plan is returned.
///
/// The core holds no locks. Callers must not run two generations for the
/// same plan slot concurrently; the later result would silently win.
pub async fn generate_plan(
    model: &dyn ChatModel,
    settings: &GenerationSettings,
    profile: &Profile,
    phase: &Phase,
    days: u32,
) -> Result<GeneratedPlan, PlanError> {
    if days == 0 {
        return Err(PlanError::Configuration(
            "day count must be at least 1".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    let span = info_span!("generate_plan", %request_id, model = model.name(), days);

    async move {
        let primary = prompt::conversation(prompt::build_prompt(profile, phase, days));
        let plan: Plan = model::call_json(model, &primary, settings.max_tokens).await?;

        let draft = Draft::new(plan, profile);
        info!(
            days = draft.plan().days.len(),
            issues = draft.issues().len(),
            "draft plan received"
        );

        if draft.is_clean() {
            Ok(draft.accept())
        } else {
            for issue in draft.issues() {
                debug!(%issue, "draft issue");
            }
            draft.refine(model, settings, profile, &primary).await
        }
    }
    .instrument(span)
    .await
}
