//! Configuration loading from the process environment.
//!
//! The loader takes any lookup function so the same resolution rules run
//! against `std::env` in production and against a plain map in tests.

use std::env::{self, VarError};

use crate::config::schema::{CommandProfile, ReadinessConfig, RunConfig, ServerConfig};
use crate::config::validation::{
    parse_bool, parse_positive_u32, parse_positive_u64, ConfigError,
};

/// Every variable [`load_from`] consults.
pub const VARIABLES: &[&str] = &[
    "SETTINGS_MODULE",
    "DJANGO_SETTINGS_MODULE",
    "DB_WAIT_MAX_TRIES",
    "DB_WAIT_FAIL_OPEN",
    "DB_WAIT_BASE_DELAY",
    "DB_WAIT_MAX_DELAY",
    "GUNICORN_WORKERS",
    "WORKERS",
    "GUNICORN_THREADS",
    "THREADS",
    "GUNICORN_TIMEOUT",
    "TIMEOUT",
    "PYTHON_BIN",
    "MANAGE_SCRIPT",
    "SERVER_BIN",
    "WSGI_APP",
    "ENTRYPOINT_DRY_RUN",
];

/// Load configuration from the real process environment.
///
/// A variable that is present but not valid UTF-8 is an error, not unset.
pub fn load_from_env() -> Result<RunConfig, ConfigError> {
    for &var in VARIABLES {
        if let Err(VarError::NotUnicode(_)) = env::var(var) {
            return Err(ConfigError::NotUnicode { var });
        }
    }
    load_from(|name: &str| env::var(name).ok())
}

/// Resolve a [`RunConfig`] through `lookup`.
///
/// For each setting the listed variable names are tried in order; a name
/// that is unset or set to a blank string is skipped. When no name yields a
/// value the default applies.
pub fn load_from<F>(lookup: F) -> Result<RunConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = RunConfig::default();

    let settings_module = first_set(&lookup, &["SETTINGS_MODULE", "DJANGO_SETTINGS_MODULE"])
        .map(|(_, value)| value)
        .unwrap_or(defaults.settings_module);

    let readiness = ReadinessConfig {
        max_tries: u32_or(&lookup, &["DB_WAIT_MAX_TRIES"], defaults.readiness.max_tries)?,
        fail_open: bool_or(&lookup, &["DB_WAIT_FAIL_OPEN"], defaults.readiness.fail_open)?,
        base_delay_secs: u64_or(
            &lookup,
            &["DB_WAIT_BASE_DELAY"],
            defaults.readiness.base_delay_secs,
        )?,
        max_delay_secs: match first_set(&lookup, &["DB_WAIT_MAX_DELAY"]) {
            Some((var, value)) => Some(parse_positive_u64(var, &value)?),
            None => defaults.readiness.max_delay_secs,
        },
    };

    let server = ServerConfig {
        workers: u32_or(&lookup, &["GUNICORN_WORKERS", "WORKERS"], defaults.server.workers)?,
        threads: u32_or(&lookup, &["GUNICORN_THREADS", "THREADS"], defaults.server.threads)?,
        timeout_secs: u64_or(
            &lookup,
            &["GUNICORN_TIMEOUT", "TIMEOUT"],
            defaults.server.timeout_secs,
        )?,
    };

    let commands = CommandProfile {
        python: string_or(&lookup, "PYTHON_BIN", defaults.commands.python),
        manage_script: string_or(&lookup, "MANAGE_SCRIPT", defaults.commands.manage_script),
        server_bin: string_or(&lookup, "SERVER_BIN", defaults.commands.server_bin),
        wsgi_app: string_or(&lookup, "WSGI_APP", defaults.commands.wsgi_app),
    };

    let dry_run = bool_or(&lookup, &["ENTRYPOINT_DRY_RUN"], defaults.dry_run)?;

    Ok(RunConfig {
        settings_module,
        readiness,
        server,
        commands,
        dry_run,
    })
}

/// First variable in `names` holding a non-blank value, trimmed.
fn first_set<F>(lookup: &F, names: &[&'static str]) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|&name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| (name, value))
    })
}

fn string_or<F>(lookup: &F, name: &'static str, default: String) -> String
where
    F: Fn(&str) -> Option<String>,
{
    first_set(lookup, &[name])
        .map(|(_, value)| value)
        .unwrap_or(default)
}

fn u32_or<F>(lookup: &F, names: &[&'static str], default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match first_set(lookup, names) {
        Some((var, value)) => parse_positive_u32(var, &value),
        None => Ok(default),
    }
}

fn u64_or<F>(lookup: &F, names: &[&'static str], default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match first_set(lookup, names) {
        Some((var, value)) => parse_positive_u64(var, &value),
        None => Ok(default),
    }
}

fn bool_or<F>(lookup: &F, names: &[&'static str], default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match first_set(lookup, names) {
        Some((var, value)) => parse_bool(var, &value),
        None => Ok(default),
    }
}
