use std::{env, time::Duration};

use lapsolve::SolveOptions;
use thiserror::Error;

pub const TIME_LIMIT_VAR: &str = "LAPSOLVE_TIME_LIMIT_MS";
pub const ITERATION_LIMIT_VAR: &str = "LAPSOLVE_ITERATION_LIMIT";

const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer (found '{value}')")]
    InvalidNumber { name: &'static str, value: String },
}

/// Solver budget read from the environment (and `.env`, when present).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub time_limit: Option<Duration>,
    pub iteration_limit: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            time_limit: Some(DEFAULT_TIME_LIMIT),
            iteration_limit: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// `LAPSOLVE_TIME_LIMIT_MS=0` turns the time limit off.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(millis) = read_number(&lookup, TIME_LIMIT_VAR)? {
            config.time_limit = (millis > 0).then(|| Duration::from_millis(millis));
        }
        if let Some(limit) = read_number(&lookup, ITERATION_LIMIT_VAR)? {
            config.iteration_limit = Some(usize::try_from(limit).map_err(|_| {
                ConfigError::InvalidNumber {
                    name: ITERATION_LIMIT_VAR,
                    value: limit.to_string(),
                }
            })?);
        }

        Ok(config)
    }

    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            time_limit: self.time_limit,
            iteration_limit: self.iteration_limit,
        }
    }
}

fn read_number(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

/// Logs go to stderr so stdout only carries the assignment.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
