//! User profile types: goal, diet, exclusions, and cycle inputs.
//!
//! The profile is plain configuration owned by the caller. The pipeline only
//! ever reads it.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::phase::parse_reference_date;

/// Default cycle length in days when none is supplied.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Fitness goal the plan should be tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Energy,
    FatLoss,
    Strength,
    SymptomRelief,
}

impl Goal {
    /// Goals that trigger the low-protein heuristic in the validator.
    pub fn wants_protein_every_meal(self) -> bool {
        matches!(self, Self::Strength | Self::FatLoss)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Energy => "energy",
            Self::FatLoss => "fat_loss",
            Self::Strength => "strength",
            Self::SymptomRelief => "symptom_relief",
        };
        f.write_str(s)
    }
}

impl FromStr for Goal {
    type Err = GoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "energy" => Ok(Self::Energy),
            "fat_loss" => Ok(Self::FatLoss),
            "strength" => Ok(Self::Strength),
            "symptom_relief" => Ok(Self::SymptomRelief),
            other => Err(GoalParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Goal`] string.
#[derive(Debug, Clone)]
pub struct GoalParseError(pub String);

impl fmt::Display for GoalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid goal: {:?} (expected energy, fat_loss, strength, or symptom_relief)",
            self.0
        )
    }
}

impl std::error::Error for GoalParseError {}

// ---------------------------------------------------------------------------

/// Dietary pattern; determines which ingredient families are banned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    #[default]
    Vegetarian,
    Vegan,
    EggsOk,
    Nonveg,
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::EggsOk => "eggs_ok",
            Self::Nonveg => "nonveg",
        };
        f.write_str(s)
    }
}

impl FromStr for Diet {
    type Err = DietParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            "eggs_ok" => Ok(Self::EggsOk),
            "nonveg" => Ok(Self::Nonveg),
            other => Err(DietParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Diet`] string.
#[derive(Debug, Clone)]
pub struct DietParseError(pub String);

impl fmt::Display for DietParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid diet: {:?} (expected vegetarian, vegan, eggs_ok, or nonveg)",
            self.0
        )
    }
}

impl std::error::Error for DietParseError {}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Everything the pipeline needs to know about the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub diet: Diet,
    /// Lowercased, deduplicated, insertion-ordered.
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub dislikes: Vec<String>,
    /// Lowercased, deduplicated, insertion-ordered.
    #[serde(default, deserialize_with = "deserialize_terms")]
    pub allergies: Vec<String>,
    /// Medical condition flag (PCOS in the product); enables the
    /// high-glycemic exclusion list and the extra prompt block.
    #[serde(default, alias = "has_pcos")]
    pub has_condition: bool,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    /// First day of the last period. Blank or unparsable values load as
    /// `None`, which yields an unknown phase.
    #[serde(
        default,
        deserialize_with = "deserialize_last_period",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_period: Option<NaiveDate>,
}

fn default_cycle_length() -> u32 {
    DEFAULT_CYCLE_LENGTH
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            goal: Goal::default(),
            diet: Diet::default(),
            dislikes: Vec::new(),
            allergies: Vec::new(),
            has_condition: false,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            last_period: None,
        }
    }
}

impl Profile {
    /// Start a profile with the given goal and diet and defaults elsewhere.
    pub fn new(goal: Goal, diet: Diet) -> Self {
        Self {
            goal,
            diet,
            ..Self::default()
        }
    }

    /// Add disliked foods, normalizing case and skipping duplicates.
    pub fn with_dislikes<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_terms(&mut self.dislikes, items);
        self
    }

    /// Add allergens, normalizing case and skipping duplicates.
    pub fn with_allergies<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_terms(&mut self.allergies, items);
        self
    }

    pub fn with_condition(mut self, has_condition: bool) -> Self {
        self.has_condition = has_condition;
        self
    }

    pub fn with_cycle(mut self, cycle_length: u32, last_period: Option<NaiveDate>) -> Self {
        self.cycle_length = cycle_length;
        self.last_period = last_period;
        self
    }
}

fn extend_terms<I, S>(terms: &mut Vec<String>, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for item in items {
        let term = item.as_ref().trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
}

fn deserialize_terms<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    let mut terms = Vec::with_capacity(raw.len());
    extend_terms(&mut terms, raw);
    Ok(terms)
}

fn deserialize_last_period<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let date = parse_reference_date(&raw);
    if date.is_none() {
        warn!(value = %raw, "last_period is not a YYYY-MM-DD date; ignoring it");
    }
    Ok(date)
}
