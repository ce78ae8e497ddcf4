//! Model client: chat transport, provider table, and JSON decoding.
//!
//! ```text
//! pipeline --messages--> call_json --> &dyn ChatModel --complete()--> raw content
//!                           |
//!                           +-- strip_fences --> serde_json (payload, then schema)
//! ```
//!
//! [`HttpChatModel`] is the production transport. Any other implementation
//! of [`ChatModel`] can stand in for it.

pub mod http;
pub mod providers;
pub mod trait_def;
pub mod types;

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ParseStage, PlanError};

pub use http::{DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, HttpChatModel, ModelConfig};
pub use providers::{ProviderRegistry, ProviderTarget};
pub use trait_def::ChatModel;
pub use types::{ChatMessage, Role};

/// Opening fence with an optional language tag, the content, closing fence.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*\s*(.*?)```").expect("fence pattern is valid")
});

/// Return the content of the first Markdown code fence, or `text` unchanged
/// if there is none.
pub fn strip_fences(text: &str) -> &str {
    FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str())
}

/// Call `model` and decode its reply as `T`.
///
/// The content is fence-stripped, parsed as JSON ([`ParseStage::Payload`]),
/// then mapped onto `T` ([`ParseStage::Schema`]). Both failures are errors;
/// nothing is guessed or partially recovered.
pub async fn call_json<T: DeserializeOwned>(
    model: &dyn ChatModel,
    messages: &[ChatMessage],
    max_tokens: u32,
) -> Result<T, PlanError> {
    let content = model.complete(messages, max_tokens).await?;
    let inner = strip_fences(&content);
    let value: Value = serde_json::from_str(inner.trim()).map_err(|e| {
        debug!(model = model.name(), error = %e, "model output is not JSON");
        PlanError::parse(ParseStage::Payload, e)
    })?;
    serde_json::from_value(value).map_err(|e| PlanError::parse(ParseStage::Schema, e))
}
