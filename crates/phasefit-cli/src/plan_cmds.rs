//! CLI handlers for `phasefit plan` and `phasefit swap`.
//!
//! Implements:
//! - `phasefit plan <profile>`              -- generate a plan and print or save it
//! - `phasefit swap <profile> <plan> ...`   -- replace one meal in a saved plan

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use phasefit_core::model::{HttpChatModel, ProviderRegistry};
use phasefit_core::phase::compute_phase;
use phasefit_core::plan::{
    GenerationSettings, MealSlot, apply_meal_swap, generate_plan, generate_single_meal_alternative,
};
use phasefit_core::PlanError;

use crate::config::PhasefitConfig;
use crate::files;

/// Wrap a pipeline error so the classified message is shown first and the
/// raw detail follows as the cause.
pub fn describe(err: PlanError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn build_model(config: &PhasefitConfig, registry: &ProviderRegistry) -> Result<HttpChatModel> {
    HttpChatModel::new(config.model.clone(), registry).map_err(describe)
}

// -----------------------------------------------------------------------
// phasefit plan
// -----------------------------------------------------------------------

#[derive(Debug)]
pub struct PlanArgs {
    pub profile: PathBuf,
    pub days: u32,
    pub day: Option<u32>,
    pub max_tokens: u32,
    pub output: Option<PathBuf>,
}

pub async fn run_plan(
    args: PlanArgs,
    config: &PhasefitConfig,
    registry: &ProviderRegistry,
) -> Result<()> {
    let profile = files::load_profile(&args.profile)?;
    let phase = compute_phase(&profile, args.day);
    let model = build_model(config, registry)?;
    let settings = GenerationSettings {
        max_tokens: args.max_tokens,
    };

    eprintln!(
        "Generating a {}-day plan for {} ({})...",
        args.days,
        phase.label(),
        profile.goal
    );
    let generated = generate_plan(&model, &settings, &profile, &phase, args.days)
        .await
        .map_err(describe)?;

    if generated.refined {
        info!(
            initial = generated.initial_issues.len(),
            remaining = generated.remaining_issues.len(),
            "plan was refined once"
        );
    }
    if !generated.remaining_issues.is_empty() {
        eprintln!("Warnings:");
        for issue in &generated.remaining_issues {
            eprintln!("  - {issue}");
        }
    }

    files::write_plan(&generated.plan, args.output.as_deref())
}

// -----------------------------------------------------------------------
// phasefit swap
// -----------------------------------------------------------------------

#[derive(Debug)]
pub struct SwapArgs {
    pub profile: PathBuf,
    pub plan: PathBuf,
    /// 1-based day number within the plan.
    pub day_number: usize,
    pub slot: MealSlot,
    pub cycle_day: Option<u32>,
    pub max_tokens: u32,
    pub output: Option<PathBuf>,
}

pub async fn run_swap(
    args: SwapArgs,
    config: &PhasefitConfig,
    registry: &ProviderRegistry,
) -> Result<()> {
    let profile = files::load_profile(&args.profile)?;
    let plan = files::load_plan(&args.plan)?;

    let day_index = args
        .day_number
        .checked_sub(1)
        .filter(|i| *i < plan.days.len())
        .with_context(|| {
            format!(
                "day {} is out of range (plan has {} day(s))",
                args.day_number,
                plan.days.len()
            )
        })?;
    let day_label = plan.days[day_index].label.clone();

    let phase = compute_phase(&profile, args.cycle_day);
    let model = build_model(config, registry)?;
    let settings = GenerationSettings {
        max_tokens: args.max_tokens,
    };

    let meal = generate_single_meal_alternative(
        &model, &settings, &profile, &phase, args.slot, &day_label,
    )
    .await
    .map_err(describe)?;
    eprintln!("New {}: {meal}", args.slot);

    let updated = apply_meal_swap(&plan, day_index, args.slot, &meal)
        .context("plan changed while swapping")?;
    files::write_plan(&updated, args.output.as_deref())
}
