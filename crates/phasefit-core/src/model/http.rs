//! HTTP chat model over `reqwest`.
//!
//! Talks either to the relay (which holds provider credentials server-side)
//! or directly to a provider's OpenAI-compatible chat-completions endpoint.
//! The response body is always read as text first: upstream failures may be
//! JSON, plain text, or HTML.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::providers::{ProviderRegistry, ProviderTarget};
use super::trait_def::ChatModel;
use super::types::ChatMessage;
use crate::error::{ParseStage, PlanError};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Fully resolved model settings, passed in by the caller.
///
/// Nothing here is read from the environment by the pipeline.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Provider name in the [`ProviderRegistry`].
    pub provider: String,
    /// Model override; the provider default is used when `None`.
    pub model: Option<String>,
    /// API key for direct mode. Ignored when `relay_url` is set.
    pub api_key: Option<String>,
    /// Relay endpoint. When set, requests go to the relay instead of the
    /// provider.
    pub relay_url: Option<String>,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ModelConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: None,
            api_key: None,
            relay_url: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Where requests are sent.
#[derive(Debug, Clone)]
enum Endpoint {
    Relay { url: String },
    Direct { api_key: String },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Outbound body. `provider` is only present for the relay.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completion envelope. Only the fields we read.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`ChatModel`] backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatModel {
    client: Client,
    target: ProviderTarget,
    endpoint: Endpoint,
    model: String,
    temperature: f32,
    display_name: String,
}

impl HttpChatModel {
    /// Build a client for `config.provider` from `registry`.
    ///
    /// Fails with [`PlanError::Configuration`] if the provider is unknown or
    /// if direct mode is selected without an API key.
    pub fn new(config: ModelConfig, registry: &ProviderRegistry) -> Result<Self, PlanError> {
        let target = registry.get(&config.provider).cloned().ok_or_else(|| {
            PlanError::Configuration(format!("Unknown provider: {}", config.provider))
        })?;

        let endpoint = match config.relay_url {
            Some(url) => Endpoint::Relay { url },
            None => {
                let api_key = config
                    .api_key
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        PlanError::Configuration(format!("No API key for {}", target.name))
                    })?;
                Endpoint::Direct { api_key }
            }
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlanError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let model = config
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| target.default_model.clone());
        let display_name = format!("{}/{}", target.name, model);

        Ok(Self {
            client,
            target,
            endpoint,
            model,
            temperature: config.temperature,
            display_name,
        })
    }

    /// The model id sent upstream.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// True when requests go through the relay.
    pub fn uses_relay(&self) -> bool {
        matches!(self.endpoint, Endpoint::Relay { .. })
    }

    fn url(&self) -> &str {
        match &self.endpoint {
            Endpoint::Relay { url } => url,
            Endpoint::Direct { .. } => &self.target.url,
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> PlanError {
        let detail = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("could not connect to {}", self.url())
        } else {
            format!("request failed: {e}")
        };
        warn!(model = %self.display_name, %detail, "model request did not complete");
        PlanError::Provider {
            status: None,
            detail,
        }
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    fn name(&self) -> &str {
        &self.display_name
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, PlanError> {
        let body = ChatCompletionRequest {
            provider: match self.endpoint {
                Endpoint::Relay { .. } => Some(self.target.name.as_str()),
                Endpoint::Direct { .. } => None,
            },
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens,
        };

        let mut request = self.client.post(self.url()).json(&body);
        if let Endpoint::Direct { api_key } = &self.endpoint {
            request = request.bearer_auth(api_key);
            for (name, value) in &self.target.extra_headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        info!(
            model = %self.display_name,
            relay = self.uses_relay(),
            messages = messages.len(),
            max_tokens,
            "sending chat request"
        );

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let raw = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            let detail = error_detail(&raw);
            warn!(model = %self.display_name, status = status.as_u16(), %detail, "provider returned an error");
            return Err(PlanError::Provider {
                status: Some(status.as_u16()),
                detail,
            });
        }

        debug!(model = %self.display_name, bytes = raw.len(), "chat response received");
        extract_content(&raw)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Tries `error.message`, then `message`, then a string `error`; falls back
/// to the raw text.
pub fn error_detail(raw: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| value.get("message").and_then(Value::as_str))
        .or_else(|| value.get("error").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

/// Extract `choices[0].message.content` from a success envelope.
///
/// A missing content field yields `"{}"` so that the payload parse, not the
/// envelope parse, reports the problem.
pub fn extract_content(raw: &str) -> Result<String, PlanError> {
    let envelope: ChatCompletionResponse =
        serde_json::from_str(raw).map_err(|e| PlanError::parse(ParseStage::Envelope, e))?;
    Ok(envelope
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_else(|| "{}".to_string()))
}
