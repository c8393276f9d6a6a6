use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::ErrorCode;
use crate::options::{FusionOptions, FusionOptionsPatch};

/// Environment variable that turns on verbose fusion diagnostics.
pub const VERBOSE_ENV: &str = "MEMFUSE_VERBOSE";

/// Contents of a `config.toml`, project- or user-level.
///
/// ```toml
/// verbose = false
///
/// [fusion]
/// max_tokens = 8000
/// min_score = 0.25
/// dedup_threshold = 0.9
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    #[serde(default)]
    pub fusion: FusionOptionsPatch,
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Options and flags after layering env, project, user, and built-in
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveConfig {
    pub options: FusionOptions,
    pub verbose: bool,
}

/// Load `<project_root>/.memfuse/config.toml`; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<FusionConfig> {
    let path = project_root.join(".memfuse/config.toml");
    load_config_file(&path)
}

/// Load `<config_dir>/memfuse/config.toml`; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<FusionConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(FusionConfig::default());
    };

    load_config_file(&config_dir.join("memfuse/config.toml"))
}

fn load_config_file(path: &Path) -> Result<FusionConfig> {
    if !path.exists() {
        return Ok(FusionConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<FusionConfig>(&content)
        .with_context(|| {
            ErrorCode::ConfigParseError
                .annotate(format_args!("Failed to parse {}", path.display()))
        })
}

/// Resolve the effective fusion configuration for a project.
///
/// Precedence, highest first: `MEMFUSE_VERBOSE` (verbose only), project
/// config, user config, built-in defaults. Out-of-range values are clamped.
///
/// # Errors
///
/// Returns an error if either config file exists but is malformed.
pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    let env_verbose = env::var(VERBOSE_ENV).ok();

    Ok(merge_configs(&user, &project, env_verbose.as_deref()))
}

fn merge_configs(
    user: &FusionConfig,
    project: &FusionConfig,
    env_verbose: Option<&str>,
) -> EffectiveConfig {
    let patch = user.fusion.overlay(project.fusion);
    let options = FusionOptions::default().apply(&patch);

    let verbose = env_verbose
        .map(is_truthy)
        .or(project.verbose)
        .or(user.verbose)
        .unwrap_or(false);

    EffectiveConfig { options, verbose }
}

/// Returns true when `MEMFUSE_VERBOSE` enables diagnostics.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn verbose_from_env() -> bool {
    env::var(VERBOSE_ENV)
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
