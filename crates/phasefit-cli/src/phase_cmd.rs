//! `phasefit phase`: show the current cycle phase.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::warn;

use phasefit_core::phase::{self, Phase, PhaseName};
use phasefit_core::Profile;

use crate::files;

/// Inputs for the phase command. Flags override values from the profile.
#[derive(Debug, Default)]
pub struct PhaseArgs {
    pub profile: Option<PathBuf>,
    pub last_period: Option<String>,
    pub cycle_length: Option<u32>,
    pub day: Option<u32>,
    pub today: Option<String>,
}

pub fn run_phase(args: PhaseArgs) -> Result<()> {
    let mut profile = match &args.profile {
        Some(path) => files::load_profile(path)?,
        None => Profile::default(),
    };
    if let Some(raw) = &args.last_period {
        profile.last_period = phase::parse_reference_date(raw);
        if profile.last_period.is_none() {
            warn!(value = %raw, "last period is not a YYYY-MM-DD date; phase is unknown");
        }
    }
    if let Some(length) = args.cycle_length {
        profile.cycle_length = length;
    }

    let today = match &args.today {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid --today date (expected YYYY-MM-DD): {raw}"))?,
        None => Local::now().date_naive(),
    };

    let phase = phase::compute_phase_on(&profile, args.day, today);
    print!("{}", render_phase(&phase, profile.cycle_length));
    Ok(())
}

/// Human-readable phase summary.
pub fn render_phase(phase: &Phase, cycle_length: u32) -> String {
    let mut out = String::new();
    if phase.name == PhaseName::Unknown {
        out.push_str("Phase: Unknown\n");
    } else {
        out.push_str(&format!("Phase: {}\n", phase.label()));
    }
    out.push_str(&format!("  {}\n", phase.name.guidance()));

    if let Some(days) = phase.days_since {
        out.push_str(&format!("  Days since last period: {days}\n"));
        let delay = phase.delay_days(cycle_length);
        if delay > 0 {
            out.push_str(&format!("  Period is {delay} day(s) later than expected\n"));
        }
    }
    out
}
