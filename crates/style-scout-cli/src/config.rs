//! Configuration loading and resolution.
//!
//! Every tunable resolves as explicit flag, then environment variable,
//! then the library default.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use style_scout::{AnalyzerConfig, ProfileOverrides};

pub const PAGE_TIMEOUT_ENV: &str = "STYLE_SCOUT_PAGE_TIMEOUT_MS";
pub const STYLESHEET_TIMEOUT_ENV: &str = "STYLE_SCOUT_STYLESHEET_TIMEOUT_MS";
pub const MAX_STYLESHEETS_ENV: &str = "STYLE_SCOUT_MAX_STYLESHEETS";
pub const USER_AGENT_ENV: &str = "STYLE_SCOUT_USER_AGENT";

/// Values given on the command line. `None` means "not passed".
#[derive(Debug, Clone, Default)]
pub struct ConfigFlags {
    pub page_timeout_ms: Option<u64>,
    pub stylesheet_timeout_ms: Option<u64>,
    pub max_stylesheets: Option<usize>,
    pub user_agent: Option<String>,
}

/// Resolve an [`AnalyzerConfig`] from flags and the process environment.
pub fn resolve_config(flags: &ConfigFlags) -> AnalyzerConfig {
    resolve_config_with(flags, |name| std::env::var(name).ok())
}

/// Same as [`resolve_config`] with an injectable environment lookup.
pub fn resolve_config_with<E>(flags: &ConfigFlags, env: E) -> AnalyzerConfig
where
    E: Fn(&str) -> Option<String>,
{
    let defaults = AnalyzerConfig::default();

    let page_timeout = resolve_number(flags.page_timeout_ms, env(PAGE_TIMEOUT_ENV), PAGE_TIMEOUT_ENV)
        .map(Duration::from_millis)
        .unwrap_or(defaults.page_timeout);
    let stylesheet_timeout = resolve_number(
        flags.stylesheet_timeout_ms,
        env(STYLESHEET_TIMEOUT_ENV),
        STYLESHEET_TIMEOUT_ENV,
    )
    .map(Duration::from_millis)
    .unwrap_or(defaults.stylesheet_timeout);
    let max_stylesheets = resolve_number(
        flags.max_stylesheets,
        env(MAX_STYLESHEETS_ENV),
        MAX_STYLESHEETS_ENV,
    )
    .unwrap_or(defaults.max_stylesheets);
    let user_agent = flags
        .user_agent
        .clone()
        .or_else(|| env(USER_AGENT_ENV))
        .map(|ua| ua.trim().to_string())
        .filter(|ua| !ua.is_empty())
        .unwrap_or_else(|| defaults.user_agent.clone());

    AnalyzerConfig {
        page_timeout,
        stylesheet_timeout,
        max_stylesheets,
        user_agent,
        ..defaults
    }
}

/// Explicit value, else a parseable env value. Garbage in the environment
/// is logged and ignored.
fn resolve_number<T: std::str::FromStr>(
    explicit: Option<T>,
    env_value: Option<String>,
    env_name: &str,
) -> Option<T> {
    if explicit.is_some() {
        return explicit;
    }
    let raw = env_value?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring {env_name}={raw:?}: not a number");
            None
        }
    }
}

/// Read a JSON overrides file.
pub fn load_overrides(path: &Path) -> anyhow::Result<ProfileOverrides> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading overrides from {}", path.display()))?;
    let overrides = serde_json::from_str(&raw)
        .with_context(|| format!("parsing overrides in {}", path.display()))?;
    Ok(overrides)
}
