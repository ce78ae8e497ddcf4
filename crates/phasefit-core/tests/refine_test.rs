//! Integration tests for plan generation and the refinement pass.

use phasefit_core::model::Role;
use phasefit_core::phase::{Phase, PhaseName};
use phasefit_core::plan::{GenerationSettings, generate_plan};
use phasefit_core::prompt::SYSTEM_PROMPT;
use phasefit_core::{ParseStage, PlanError};
use phasefit_test_utils::{ScriptedModel, clean_vegan_plan, generic_lunch_plan, vegan_fat_loss_profile};

fn follicular() -> Phase {
    Phase {
        name: PhaseName::Follicular,
        day_in_cycle: 8,
        days_since: Some(7),
    }
}

#[tokio::test]
async fn clean_plan_needs_one_call() {
    let model = ScriptedModel::new().reply_json(&clean_vegan_plan());
    let settings = GenerationSettings::default();

    let generated = generate_plan(&model, &settings, &vegan_fat_loss_profile(), &follicular(), 1)
        .await
        .unwrap();

    assert_eq!(model.call_count(), 1);
    assert!(!generated.refined);
    assert!(generated.initial_issues.is_empty());
    assert!(!generated.plan.grocery.is_empty(), "grocery derived from meals");

    let call = &model.calls()[0];
    assert_eq!(call.max_tokens, 900);
    assert_eq!(call.messages.len(), 2);
    assert_eq!(call.messages[0].role, Role::System);
    assert_eq!(call.messages[0].content, SYSTEM_PROMPT);
    assert!(call.messages[1].content.contains("Create a 1-day plan."));
}

#[tokio::test]
async fn generic_meal_triggers_exactly_one_correction() {
    let draft = generic_lunch_plan();
    let model = ScriptedModel::new()
        .reply_json(&draft)
        .reply(format!(
            "```json\n{}\n```",
            serde_json::to_string(&clean_vegan_plan()).unwrap()
        ));

    let generated = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        1,
    )
    .await
    .unwrap();

    assert_eq!(model.call_count(), 2);
    assert!(generated.refined);
    assert_eq!(generated.initial_issues.len(), 1);
    assert!(generated.remaining_issues.is_empty());
    assert_eq!(
        generated.plan.days[0].meals.lunch,
        clean_vegan_plan().days[0].meals.lunch
    );

    let second = &model.calls()[1];
    assert_eq!(second.messages.len(), 4);
    assert_eq!(second.messages[2].role, Role::Assistant);
    assert_eq!(second.messages[2].content, serde_json::to_string(&draft).unwrap());
    assert_eq!(second.messages[3].role, Role::User);
    assert!(second.messages[3]
        .content
        .contains("- Day 1 lunch: too generic (Tofu and spinach bowl)"));
}

#[tokio::test]
async fn imperfect_refinement_is_returned_without_retry() {
    let model = ScriptedModel::new()
        .reply_json(&generic_lunch_plan())
        .reply_json(&generic_lunch_plan());

    let generated = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        1,
    )
    .await
    .unwrap();

    assert_eq!(model.call_count(), 2);
    assert!(generated.refined);
    assert_eq!(generated.remaining_issues.len(), 1);
}

#[tokio::test]
async fn model_grocery_list_is_preserved() {
    let mut plan = clean_vegan_plan();
    plan.grocery = vec!["Tofu".to_string(), "Lentils".to_string()];
    let model = ScriptedModel::new().reply_json(&plan);

    let generated = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        1,
    )
    .await
    .unwrap();

    assert_eq!(generated.plan.grocery, vec!["Tofu", "Lentils"]);
}

#[tokio::test]
async fn non_json_reply_is_parse_error() {
    let model = ScriptedModel::new().reply("Sorry, I can't help with that.");

    let err = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        1,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PlanError::Parse {
            stage: ParseStage::Payload,
            ..
        }
    ));
}

#[tokio::test]
async fn missing_days_is_schema_error() {
    let model = ScriptedModel::new().reply(r#"{"grocery":["Oats"]}"#);

    let err = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        1,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PlanError::Parse {
            stage: ParseStage::Schema,
            ..
        }
    ));
}

#[tokio::test]
async fn failure_on_corrective_call_aborts() {
    let model = ScriptedModel::new()
        .reply_json(&generic_lunch_plan())
        .fail(PlanError::Provider {
            status: Some(429),
            detail: "Rate limit reached".to_string(),
        });

    let err = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        1,
    )
    .await
    .unwrap_err();

    assert_eq!(model.call_count(), 2);
    assert_eq!(err.user_message(), "Rate limit / quota exceeded");
}

#[tokio::test]
async fn zero_days_is_rejected_before_calling() {
    let model = ScriptedModel::new();

    let err = generate_plan(
        &model,
        &GenerationSettings::default(),
        &vegan_fat_loss_profile(),
        &follicular(),
        0,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlanError::Configuration(_)));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn custom_max_tokens_reaches_model() {
    let model = ScriptedModel::new().reply_json(&clean_vegan_plan());
    let settings = GenerationSettings { max_tokens: 1500 };

    generate_plan(&model, &settings, &vegan_fat_loss_profile(), &follicular(), 1)
        .await
        .unwrap();

    assert_eq!(model.calls()[0].max_tokens, 1500);
}
