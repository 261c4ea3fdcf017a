//! Environment-driven configuration for the calculator CLI
//!
//! Values are read from `CALCULATOR_*` variables and then overridden by
//! command-line flags.

use std::env;
use std::str::FromStr;

/// Prefix for every environment variable the CLI reads
pub const ENV_PREFIX: &str = "CALCULATOR";

/// Log filter used when `CALCULATOR_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Builder for loading multiple environment variables with consistent prefix
#[derive(Debug)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load a string value with default. Blank values count as unset.
    pub fn load_string(&self, suffix: &str, default: &str) -> String {
        env::var(self.key(suffix))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Load a parsed value with default
    pub fn load_parsed<T>(&self, suffix: &str, default: T) -> T
    where
        T: FromStr,
    {
        env::var(self.key(suffix))
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// Runtime settings for a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Emit ANSI colour codes in log output
    pub log_ansi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_ansi: false,
        }
    }
}

impl Config {
    /// Load from `CALCULATOR_LOG` and `CALCULATOR_LOG_ANSI`, falling back to defaults
    pub fn from_env() -> Self {
        let loader = EnvLoader::new(ENV_PREFIX);
        let defaults = Self::default();
        Self {
            log_filter: loader.load_string("LOG", &defaults.log_filter),
            log_ansi: loader.load_parsed("LOG_ANSI", defaults.log_ansi),
        }
    }

    /// Apply `--verbose` / `--quiet`, which take precedence over the environment
    pub fn with_verbosity(mut self, verbose: bool, quiet: bool) -> Self {
        if verbose {
            self.log_filter = "debug".to_string();
        } else if quiet {
            self.log_filter = "error".to_string();
        }
        self
    }
}
