mod config;
mod files;
mod phase_cmd;
mod plan_cmds;

#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use anyhow::bail;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use phasefit_core::model::ProviderRegistry;
use phasefit_core::plan::{DEFAULT_MAX_TOKENS, MealSlot};

use config::{ModelOverrides, PhasefitConfig};

#[derive(Parser)]
#[command(name = "phasefit", about = "Cycle-aware meal and workout plans from an LLM")]
struct Cli {
    /// Provider name: openai, groq, openrouter (overrides PHASEFIT_PROVIDER)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model id (overrides PHASEFIT_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Send requests through a relay instead of calling the provider directly
    /// (overrides PHASEFIT_RELAY_URL)
    #[arg(long, global = true)]
    relay_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a phasefit config file from --provider, --model and --relay-url
    Init {
        /// Request timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
        /// API key to store in the config file (env vars still take precedence)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show the cycle phase for a profile or a last-period date
    Phase {
        /// Profile file (TOML, or JSON with a .json extension)
        #[arg(long)]
        profile: Option<PathBuf>,
        /// First day of the last period (YYYY-MM-DD)
        #[arg(long)]
        last_period: Option<String>,
        /// Cycle length in days
        #[arg(long)]
        cycle_length: Option<u32>,
        /// Use this cycle day instead of computing it from dates
        #[arg(long)]
        day: Option<u32>,
        /// Compute as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
    /// Generate a plan
    Plan {
        /// Profile file (TOML, or JSON with a .json extension)
        profile: PathBuf,
        /// Number of days to plan
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Use this cycle day instead of computing it from dates
        #[arg(long)]
        day: Option<u32>,
        /// Completion budget per model call
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace one meal in a saved plan
    Swap {
        /// Profile file (TOML, or JSON with a .json extension)
        profile: PathBuf,
        /// Plan JSON file written by `phasefit plan`
        plan: PathBuf,
        /// Day number within the plan (1-based)
        #[arg(long)]
        day: usize,
        /// Meal slot: breakfast, lunch, dinner, snack
        #[arg(long)]
        slot: MealSlot,
        /// Use this cycle day instead of computing it from dates
        #[arg(long)]
        cycle_day: Option<u32>,
        /// Completion budget for the model call
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Execute the `phasefit init` command: write config file.
fn cmd_init(
    section: config::ModelSection,
    force: bool,
    registry: &ProviderRegistry,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(provider) = section
        .provider
        .as_deref()
        .filter(|p| registry.get(p).is_none())
    {
        bail!(
            "unknown provider {provider:?} (expected one of: {})",
            registry.list().join(", ")
        );
    }

    let has_key = section.api_key.is_some();
    let cfg = config::ConfigFile { model: section };
    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    if let Some(provider) = &cfg.model.provider {
        println!("  model.provider = {provider}");
    }
    if let Some(model) = &cfg.model.model {
        println!("  model.model = {model}");
    }
    if let Some(url) = &cfg.model.relay_url {
        println!("  model.relay_url = {url}");
    }
    if has_key {
        println!("  model.api_key = (stored)");
    }
    println!();
    println!("Next: run `phasefit plan <profile.toml>` to generate a plan.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let overrides = ModelOverrides {
        provider: cli.provider,
        model: cli.model,
        relay_url: cli.relay_url,
    };
    let registry = ProviderRegistry::builtin();

    match cli.command {
        Commands::Init {
            timeout_secs,
            api_key,
            force,
        } => {
            let section = config::ModelSection {
                provider: Some(
                    overrides
                        .provider
                        .unwrap_or_else(|| config::DEFAULT_PROVIDER.to_string()),
                ),
                model: overrides.model,
                relay_url: overrides.relay_url,
                timeout_secs: Some(timeout_secs),
                api_key,
            };
            cmd_init(section, force, &registry)?;
        }
        Commands::Phase {
            profile,
            last_period,
            cycle_length,
            day,
            today,
        } => {
            phase_cmd::run_phase(phase_cmd::PhaseArgs {
                profile,
                last_period,
                cycle_length,
                day,
                today,
            })?;
        }
        Commands::Plan {
            profile,
            days,
            day,
            max_tokens,
            output,
        } => {
            let resolved = PhasefitConfig::resolve(&overrides, &registry)?;
            let args = plan_cmds::PlanArgs {
                profile,
                days,
                day,
                max_tokens,
                output,
            };
            plan_cmds::run_plan(args, &resolved, &registry).await?;
        }
        Commands::Swap {
            profile,
            plan,
            day,
            slot,
            cycle_day,
            max_tokens,
            output,
        } => {
            let resolved = PhasefitConfig::resolve(&overrides, &registry)?;
            let args = plan_cmds::SwapArgs {
                profile,
                plan,
                day_number: day,
                slot,
                cycle_day,
                max_tokens,
                output,
            };
            plan_cmds::run_swap(args, &resolved, &registry).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "phasefit", &mut std::io::stdout());
        }
    }

    Ok(())
}
