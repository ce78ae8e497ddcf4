//! Shared test utilities for phasefit integration tests.
//!
//! Provides a scripted [`ChatModel`] that replays canned replies and records
//! every request, plus a few profile and plan fixtures.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use phasefit_core::model::{ChatMessage, ChatModel};
use phasefit_core::plan::{DayPlan, Meals, Plan};
use phasefit_core::profile::{Diet, Goal, Profile};
use phasefit_core::PlanError;

/// One recorded call to a [`ScriptedModel`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// A [`ChatModel`] that returns queued replies in order.
///
/// Running out of replies is reported as a provider error so a test that
/// makes an unexpected extra call fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, PlanError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply with raw assistant content.
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()))
    }

    /// Queue a reply holding `value` serialized as JSON.
    pub fn reply_json(self, value: &impl serde::Serialize) -> Self {
        let content = serde_json::to_string(value).expect("fixture serializes");
        self.reply(content)
    }

    /// Queue a failure.
    pub fn fail(self, error: PlanError) -> Self {
        self.push(Err(error))
    }

    fn push(self, reply: Result<String, PlanError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, PlanError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            max_tokens,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlanError::Provider {
                    status: None,
                    detail: "scripted model has no more replies".to_string(),
                })
            })
    }
}

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

/// Vegan profile with the fat-loss goal, which enables the protein check.
pub fn vegan_fat_loss_profile() -> Profile {
    Profile::new(Goal::FatLoss, Diet::Vegan)
}

/// A single day built from four meals and a workout.
pub fn day(label: &str, meals: [&str; 4], workout: &str) -> DayPlan {
    let [breakfast, lunch, dinner, snack] = meals;
    DayPlan {
        label: label.to_string(),
        meals: Meals {
            breakfast: breakfast.to_string(),
            lunch: lunch.to_string(),
            dinner: dinner.to_string(),
            snack: snack.to_string(),
        },
        workout: workout.to_string(),
    }
}

/// One-day plan that passes validation for [`vegan_fat_loss_profile`].
pub fn clean_vegan_plan() -> Plan {
    Plan {
        days: vec![day(
            "Day 1 • Follicular",
            [
                "Tofu scramble (150 g tofu, 1 cup spinach)",
                "Chickpea salad (1 cup chickpeas, cucumber, lemon)",
                "Lentil dal (1 cup) with brown rice (1/2 cup)",
                "Edamame (1 cup, steamed)",
            ],
            "Strength circuit (30 min)",
        )],
        grocery: vec![],
    }
}

/// [`clean_vegan_plan`] with a generic lunch.
pub fn generic_lunch_plan() -> Plan {
    let mut plan = clean_vegan_plan();
    plan.days[0].meals.lunch = "Tofu and spinach bowl".to_string();
    plan
}
