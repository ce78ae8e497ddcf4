//! Reading profiles and plans from disk, writing plans back out.

use std::path::Path;

use anyhow::{Context, Result};

use phasefit_core::{Plan, Profile};

/// Load a profile from a TOML file, or from JSON if the extension is `.json`.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile file: {}", path.display()))?;
    let profile = if has_json_extension(path) {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse profile file: {}", path.display()))?
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse profile file: {}", path.display()))?
    };
    Ok(profile)
}

/// Load a plan previously written by `phasefit plan`.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse plan file: {}", path.display()))
}

/// Write `plan` as pretty JSON to `output`, or to stdout when `None`.
pub fn write_plan(plan: &Plan, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).context("failed to serialize plan")?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write plan file: {}", path.display()))?;
            eprintln!("Plan written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
