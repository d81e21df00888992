use chrono::Duration;
use std::env;
use std::path::PathBuf;

use crate::token::DEFAULT_TTL_HOURS;

const DEFAULT_LOG_FILTER: &str = "info";
/// Ten years.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366 * 10;
const DEFAULT_MEMORY_QUOTA: usize = 5 * 1024 * 1024;

/// Process configuration.
///
/// # Environment Variables
/// - `SCHOOLD_WORKSPACE`: workspace opened at startup (default: none)
/// - `SCHOOLD_TOKEN_TTL_HOURS`: session lifetime in hours, at most ten years
///   (default: 24)
/// - `SCHOOLD_SEED_DEMO`: seed demo fixtures on workspace open (default: true)
/// - `SCHOOLD_IN_MEMORY`: run on a process-local store instead of a workspace
///   (default: false)
/// - `SCHOOLD_MEMORY_QUOTA`: byte quota of that store, 0 for none (default: 5 MiB)
/// - `SCHOOLD_LOG` or `RUST_LOG`: tracing filter (default: "info")
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: Option<PathBuf>,
    pub token_ttl: Duration,
    pub seed_demo: bool,
    pub in_memory: bool,
    pub memory_quota: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            token_ttl: Duration::hours(DEFAULT_TTL_HOURS),
            seed_demo: true,
            in_memory: false,
            memory_quota: DEFAULT_MEMORY_QUOTA,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let workspace = lookup("SCHOOLD_WORKSPACE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let token_ttl = match lookup("SCHOOLD_TOKEN_TTL_HOURS") {
            None => defaults.token_ttl,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(h) if (1..=MAX_TOKEN_TTL_HOURS).contains(&h) => Duration::hours(h),
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid SCHOOLD_TOKEN_TTL_HOURS");
                    defaults.token_ttl
                }
            },
        };

        let seed_demo = lookup("SCHOOLD_SEED_DEMO")
            .map(|raw| flag(&raw))
            .unwrap_or(defaults.seed_demo);
        let in_memory = lookup("SCHOOLD_IN_MEMORY")
            .map(|raw| flag(&raw))
            .unwrap_or(defaults.in_memory);

        let memory_quota = match lookup("SCHOOLD_MEMORY_QUOTA") {
            None => defaults.memory_quota,
            Some(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "ignoring invalid SCHOOLD_MEMORY_QUOTA");
                defaults.memory_quota
            }),
        };

        let log_filter = lookup("SCHOOLD_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or(defaults.log_filter);

        Self {
            workspace,
            token_ttl,
            seed_demo,
            in_memory,
            memory_quota,
            log_filter,
        }
    }
}

/// Anything but `0`/`false`/`no`/`off` switches a flag on.
fn flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
