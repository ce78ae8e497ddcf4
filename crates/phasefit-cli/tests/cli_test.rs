//! End-to-end tests for the `phasefit` binary.
//!
//! Only commands that need no network are exercised here; model-backed
//! commands are covered by the core crate's tests.

use std::path::Path;
use std::process::{Command, Output};

fn phasefit(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phasefit"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("RUST_LOG", "off")
        .env_remove("PHASEFIT_PROVIDER")
        .env_remove("PHASEFIT_MODEL")
        .env_remove("PHASEFIT_RELAY_URL")
        .env_remove("PHASEFIT_API_KEY")
        .env_remove("PHASEFIT_TIMEOUT_SECS")
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("failed to run phasefit binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn phase_wraps_late_cycle() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = phasefit(
        tmp.path(),
        &[
            "phase",
            "--last-period",
            "2026-01-01",
            "--cycle-length",
            "28",
            "--today",
            "2026-01-31",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with("Phase: Menstruation (day 3)"), "got: {text}");
    assert!(text.contains("Days since last period: 30"));
    assert!(text.contains("2 day(s) later than expected"));
}

#[test]
fn phase_manual_day_override() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = phasefit(tmp.path(), &["phase", "--day", "10"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).starts_with("Phase: Follicular (day 10)"));
}

#[test]
fn phase_reads_profile_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let profile = tmp.path().join("profile.toml");
    std::fs::write(
        &profile,
        "goal = \"energy\"\ndiet = \"vegetarian\"\ncycle_length = 30\nlast_period = \"2026-03-01\"\n",
    )
    .unwrap();

    let out = phasefit(
        tmp.path(),
        &[
            "phase",
            "--profile",
            profile.to_str().unwrap(),
            "--today",
            "2026-03-15",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).starts_with("Phase: Ovulation (day 15)"));
}

#[test]
fn phase_with_malformed_profile_date_is_unknown() {
    let tmp = tempfile::TempDir::new().unwrap();
    let profile = tmp.path().join("profile.toml");
    std::fs::write(&profile, "goal = \"energy\"\nlast_period = \"03/01/2025\"\n").unwrap();

    let out = phasefit(tmp.path(), &["phase", "--profile", profile.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).starts_with("Phase: Unknown"));
}

#[test]
fn phase_without_date_is_unknown() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = phasefit(tmp.path(), &["phase"]);
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("Phase: Unknown"));
}

#[test]
fn init_writes_config_and_refuses_overwrite() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = phasefit(
        tmp.path(),
        &["init", "--provider", "groq", "--relay-url", "http://localhost:3000/api/chat"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let path = tmp.path().join("phasefit").join("config.toml");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("provider = \"groq\""));
    assert!(contents.contains("relay_url = \"http://localhost:3000/api/chat\""));

    let again = phasefit(tmp.path(), &["init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already exists"));

    let forced = phasefit(tmp.path(), &["init", "--force"]);
    assert!(forced.status.success(), "stderr: {}", stderr(&forced));
}

#[test]
fn init_rejects_unknown_provider() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = phasefit(tmp.path(), &["init", "--provider", "mystery"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unknown provider"));
}

#[test]
fn plan_without_key_is_configuration_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let profile = tmp.path().join("profile.toml");
    std::fs::write(&profile, "goal = \"strength\"\ndiet = \"vegan\"\n").unwrap();

    let out = phasefit(tmp.path(), &["plan", profile.to_str().unwrap(), "--days", "1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("No API key for openai"), "stderr: {}", stderr(&out));
}

#[test]
fn swap_rejects_out_of_range_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    let profile = tmp.path().join("profile.toml");
    std::fs::write(&profile, "goal = \"energy\"\ndiet = \"vegan\"\n").unwrap();
    let plan = tmp.path().join("plan.json");
    let fixture = phasefit_test_utils::clean_vegan_plan();
    std::fs::write(&plan, serde_json::to_string(&fixture).unwrap()).unwrap();

    let out = phasefit(
        tmp.path(),
        &[
            "swap",
            profile.to_str().unwrap(),
            plan.to_str().unwrap(),
            "--day",
            "3",
            "--slot",
            "lunch",
        ],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("day 3 is out of range"));
}

#[test]
fn completions_for_bash() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = phasefit(tmp.path(), &["completions", "bash"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("phasefit"));
}
