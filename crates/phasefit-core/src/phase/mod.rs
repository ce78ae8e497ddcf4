//! Cycle phase calculation.
//!
//! Maps a reference date (start of the last period) and a cycle length to a
//! named phase and a 1-based day-in-cycle. A manual day override bypasses the
//! date arithmetic entirely. Everything here is pure; the only clock read is
//! in [`compute_phase`], which delegates to [`compute_phase_on`].

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Named segment of the menstrual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseName {
    Menstruation,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

impl PhaseName {
    /// One-line guidance shown alongside the phase.
    pub fn guidance(self) -> &'static str {
        match self {
            Self::Menstruation => {
                "Energy may dip. Focus on rest, hydration, iron-rich foods (lentils, spinach)."
            }
            Self::Follicular => {
                "Estrogen rises, energy improves. Great for strength training & colorful meals."
            }
            Self::Ovulation => {
                "Peak energy. Favor lean protein, anti-inflammatory foods (omega-3s)."
            }
            Self::Luteal => {
                "PMS may occur. Include magnesium-rich foods, complex carbs, calming routines."
            }
            Self::Unknown => "Set the start date of your last period to see phase guidance.",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Menstruation => "Menstruation",
            Self::Follicular => "Follicular",
            Self::Ovulation => "Ovulation",
            Self::Luteal => "Luteal",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// The derived phase for a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    /// 1-based day within the cycle, or 0 when unknown.
    pub day_in_cycle: u32,
    /// Whole days since the reference date. `None` when unknown or when a
    /// manual day override was used.
    pub days_since: Option<i64>,
}

impl Phase {
    /// The phase returned when there is not enough input to compute one.
    pub const UNKNOWN: Phase = Phase {
        name: PhaseName::Unknown,
        day_in_cycle: 0,
        days_since: None,
    };

    /// Days past the expected start of the next period. Display only.
    pub fn delay_days(&self, cycle_length: u32) -> i64 {
        match self.days_since {
            Some(days) => (days - i64::from(cycle_length)).max(0),
            None => 0,
        }
    }

    /// Short human label, e.g. `Luteal (day 20)`.
    pub fn label(&self) -> String {
        format!("{} (day {})", self.name, self.day_in_cycle)
    }
}

/// Map a 1-based cycle day to its phase.
///
/// The boundaries are fixed: days 1-5 menstruation, 6-13 follicular, 14-16
/// ovulation, 17 onward luteal. Day 0 is unknown.
pub fn phase_from_day(day: u32) -> PhaseName {
    match day {
        0 => PhaseName::Unknown,
        1..=5 => PhaseName::Menstruation,
        6..=13 => PhaseName::Follicular,
        14..=16 => PhaseName::Ovulation,
        _ => PhaseName::Luteal,
    }
}

/// Parse a `YYYY-MM-DD` calendar date. Returns `None` for anything else.
///
/// The value is treated as a local calendar date, never as a timestamp, so
/// there is no timezone drift around midnight.
pub fn parse_reference_date(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").ok()
}

/// Compute the phase as of `today`.
///
/// - A positive `manual_day` wins: the day is used as-is and `days_since` is
///   `None`. Zero is treated as no override.
/// - Without a reference date or with a zero cycle length the result is
///   [`Phase::UNKNOWN`].
/// - Otherwise the day wraps modulo the cycle length, so a late cycle stays
///   within `1..=cycle_length`.
pub fn phase_at(
    reference: Option<NaiveDate>,
    cycle_length: u32,
    manual_day: Option<u32>,
    today: NaiveDate,
) -> Phase {
    if let Some(day) = manual_day.filter(|d| *d > 0) {
        return Phase {
            name: phase_from_day(day),
            day_in_cycle: day,
            days_since: None,
        };
    }

    let Some(reference) = reference else {
        return Phase::UNKNOWN;
    };
    if cycle_length == 0 {
        return Phase::UNKNOWN;
    }

    let days_since = (today - reference).num_days();
    // rem_euclid keeps a future reference date inside the cycle as well.
    let day_in_cycle = days_since.rem_euclid(i64::from(cycle_length)) as u32 + 1;

    Phase {
        name: phase_from_day(day_in_cycle),
        day_in_cycle,
        days_since: Some(days_since),
    }
}

/// Compute the phase for a profile as of an explicit date.
pub fn compute_phase_on(profile: &Profile, manual_day: Option<u32>, today: NaiveDate) -> Phase {
    phase_at(profile.last_period, profile.cycle_length, manual_day, today)
}

/// Compute the phase for a profile as of the local date.
pub fn compute_phase(profile: &Profile, manual_day: Option<u32>) -> Phase {
    compute_phase_on(profile, manual_day, Local::now().date_naive())
}
