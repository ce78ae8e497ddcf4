//! The `ChatModel` trait -- the seam between the pipeline and a model
//! endpoint.
//!
//! The HTTP client ([`super::HttpChatModel`]) implements it for real
//! providers; tests substitute scripted implementations. The trait is
//! object-safe so pipeline entry points can take `&dyn ChatModel`.

use async_trait::async_trait;

use super::types::ChatMessage;
use crate::error::PlanError;

/// A chat-completion endpoint.
///
/// Implementations send `messages` and return the assistant's raw message
/// content exactly as the model produced it (fences and all). Decoding the
/// content is the caller's job; see [`super::call_json`].
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Short name for logging (e.g. `openai/gpt-4o-mini`).
    fn name(&self) -> &str;

    /// Send one chat request and return the assistant content.
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32)
    -> Result<String, PlanError>;
}

// Compile-time assertion: ChatModel must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn ChatModel) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the last message back, used only to prove the trait can be
    /// implemented and used as `dyn ChatModel`.
    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            _max_tokens: u32,
        ) -> Result<String, PlanError> {
            Ok(messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn chat_model_is_object_safe() {
        let model: Box<dyn ChatModel> = Box::new(EchoModel);
        assert_eq!(model.name(), "echo");
        let out = model
            .complete(&[ChatMessage::user("hello")], 10)
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }
}
