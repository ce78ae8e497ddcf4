//! Error taxonomy for the generation pipeline.
//!
//! Every failure surfaced to the caller is a [`PlanError`]. Provider
//! failures additionally map to a user-facing [`ErrorCategory`] through an
//! ordered substring table; the mapping is a heuristic and may misclassify
//! unusual upstream messages.

use std::fmt;

use thiserror::Error;

use crate::plan::validate::ValidationIssue;

/// Which JSON document failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// The provider's chat-completion envelope.
    Envelope,
    /// The model's message content (after fence stripping).
    Payload,
    /// The payload parsed but did not match the expected schema.
    Schema,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Envelope => "response envelope",
            Self::Payload => "model output",
            Self::Schema => "plan schema",
        };
        f.write_str(s)
    }
}

/// Errors produced by the generation pipeline.
#[derive(Debug, Error)]
pub enum PlanError {
    /// No usable credential or endpoint for the selected provider.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider (or relay) answered with a non-success status, or the
    /// request never completed. `status` is `None` for transport failures
    /// such as timeouts.
    #[error("{}", provider_message(.status, .detail))]
    Provider { status: Option<u16>, detail: String },

    /// A JSON document could not be parsed.
    #[error("failed to parse {stage}: {detail}")]
    Parse { stage: ParseStage, detail: String },

    /// A single-meal replacement did not pass validation.
    #[error("alternative did not pass validation ({} issue(s))", .issues.len())]
    Validation { issues: Vec<ValidationIssue> },
}

fn provider_message(status: &Option<u16>, detail: &str) -> String {
    match *status {
        Some(code) => format!("{code} {detail}"),
        None => detail.to_string(),
    }
}

impl PlanError {
    pub(crate) fn parse(stage: ParseStage, detail: impl fmt::Display) -> Self {
        Self::Parse {
            stage,
            detail: detail.to_string(),
        }
    }

    /// Classify this error into a user-facing category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Provider { status, detail } => {
                classify_provider_detail(&provider_message(status, detail))
            }
            Self::Parse { .. } => ErrorCategory::MalformedOutput,
            Self::Validation { .. } => ErrorCategory::FailedValidation,
        }
    }

    /// Message suitable for showing to the end user.
    ///
    /// Configuration errors are surfaced verbatim; everything else uses the
    /// category text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(msg) => msg.clone(),
            other => other.category().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// User-facing category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Unauthorized,
    InvalidCredential,
    RateLimited,
    ModelNotFound,
    AccessDenied,
    NetworkOrProvider,
    MalformedOutput,
    FailedValidation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Configuration => "Configuration error",
            Self::Unauthorized => "Unauthorized (check API key & provider)",
            Self::InvalidCredential => "Invalid API key",
            Self::RateLimited => "Rate limit / quota exceeded",
            Self::ModelNotFound => "Model not found for this provider",
            Self::AccessDenied => "Access denied (org/project/billing)",
            Self::NetworkOrProvider => "Network or provider issue",
            Self::MalformedOutput => "The model returned output that was not valid plan JSON",
            Self::FailedValidation => "Alternative did not pass validation",
        };
        f.write_str(s)
    }
}

/// Ordered (all-of substrings, category) rules, tried top to bottom against
/// the lowercased `"<status> <detail>"` text. The first rule whose
/// substrings all occur wins.
const PROVIDER_RULES: &[(&[&str], ErrorCategory)] = &[
    (&["401"], ErrorCategory::Unauthorized),
    (&["incorrect api key"], ErrorCategory::InvalidCredential),
    (&["invalid api key"], ErrorCategory::InvalidCredential),
    (&["429"], ErrorCategory::RateLimited),
    (&["404", "model"], ErrorCategory::ModelNotFound),
    (&["access"], ErrorCategory::AccessDenied),
];

/// Classify a provider failure message.
pub fn classify_provider_detail(message: &str) -> ErrorCategory {
    let low = message.to_lowercase();
    PROVIDER_RULES
        .iter()
        .find(|(needles, _)| needles.iter().all(|n| low.contains(n)))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::NetworkOrProvider)
}
