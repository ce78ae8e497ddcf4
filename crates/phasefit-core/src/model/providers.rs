//! Provider registry -- the named upstream targets a request can go to.
//!
//! Each target carries the chat-completions URL, the name of the
//! environment variable that conventionally holds its API key, any extra
//! headers it requires, and a default model. The registry never reads the
//! environment itself; callers resolve keys and pass them in.

use std::collections::HashMap;

/// One upstream chat-completions provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTarget {
    /// Registry key (e.g. `openai`).
    pub name: String,
    /// Full chat-completions URL.
    pub url: String,
    /// Environment variable that conventionally holds the API key.
    pub api_key_env: String,
    /// Extra headers sent on every request.
    pub extra_headers: Vec<(String, String)>,
    /// Model used when the caller does not pick one.
    pub default_model: String,
}

impl ProviderTarget {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        api_key_env: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            api_key_env: api_key_env.into(),
            extra_headers: Vec::new(),
            default_model: default_model.into(),
        }
    }

    /// Add or replace an extra header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.extra_headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.extra_headers.push((name, value.into()));
        self
    }
}

/// A collection of [`ProviderTarget`]s, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    targets: HashMap<String, ProviderTarget>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in providers: `openai`, `groq`, `openrouter`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ProviderTarget::new(
            "openai",
            "https://api.openai.com/v1/chat/completions",
            "OPENAI_API_KEY",
            "gpt-4o-mini",
        ));
        registry.register(ProviderTarget::new(
            "groq",
            "https://api.groq.com/openai/v1/chat/completions",
            "GROQ_API_KEY",
            "deepseek-r1-distill-llama-70b",
        ));
        registry.register(
            ProviderTarget::new(
                "openrouter",
                "https://openrouter.ai/api/v1/chat/completions",
                "OPENROUTER_API_KEY",
                "openrouter/auto",
            )
            .with_header("HTTP-Referer", "http://localhost:5173")
            .with_header("X-Title", "PhaseFit"),
        );
        registry
    }

    /// Register a target. Replaces and returns any target with the same name.
    pub fn register(&mut self, target: ProviderTarget) -> Option<ProviderTarget> {
        self.targets.insert(target.name.clone(), target)
    }

    /// Look up a target by name.
    pub fn get(&self, name: &str) -> Option<&ProviderTarget> {
        self.targets.get(name)
    }

    /// Names of all registered targets, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
